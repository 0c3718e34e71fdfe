// ==========================================
// 看板 API 集成测试
// ==========================================
// 测试目标: DashboardApi（打开工作簿 → 月份选择 → 角色视图）
// ==========================================


use qc_tracker::api::{ApiError, DashboardApi, DashboardResponse, DashboardSection, MonthSelection};
use qc_tracker::config::AnalyticsConfig;
use qc_tracker::domain::{EmptyReason, RoleView};
use tempfile::TempDir;
use test_helpers::{create_csv_workbook, date, sheet, tokens, RowBuilder};

fn workbook_dir() -> TempDir {
    create_csv_workbook(&[
        sheet(
            "JAN26",
            vec![
                RowBuilder::new("SO-1", "AC-HK-BK")
                    .counts(100, 96, 4)
                    .fails(1, 3)
                    .inspector("ANA")
                    .build(),
                RowBuilder::new("SO-2", "PI-CB")
                    .counts(20, 20, 0)
                    .inspector("PA/SEWING")
                    .build(),
            ],
        ),
        sheet(
            "FEB26",
            vec![RowBuilder::new("SO-3", "AC-HK-RG")
                .counts(50, 49, 1)
                .inspector("BEN")
                .red_flag()
                .build()],
        ),
        sheet(
            "APR26",
            vec![RowBuilder::new("SO-4", "MI-556").counts(30, 30, 0).build()],
        ),
        sheet("Reference", vec![]),
    ])
    .unwrap()
}

fn open_api(dir: &TempDir) -> DashboardApi {
    DashboardApi::open(dir.path(), AnalyticsConfig::default()).unwrap()
}

#[test]
fn test_periods_and_presets() {
    let dir = workbook_dir();
    let api = open_api(&dir);

    assert_eq!(api.available_periods(), tokens(&["JAN26", "FEB26", "APR26"]));

    let presets = api.presets(date(2026, 2, 15));
    let labels: Vec<&str> = presets.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["YTD 2026", "Q1 2026", "Q2 2026"]);
    // YTD 不包含 now 之后的月份
    assert_eq!(presets[0].periods, tokens(&["JAN26", "FEB26"]));
}

#[test]
fn test_resolve_selection() {
    let dir = workbook_dir();
    let api = open_api(&dir);
    let now = date(2026, 5, 1);

    assert_eq!(
        api.resolve_selection(&MonthSelection::Latest, now).unwrap(),
        tokens(&["APR26"])
    );
    assert_eq!(
        api.resolve_selection(&MonthSelection::Preset("q2 2026".into()), now)
            .unwrap(),
        tokens(&["APR26"])
    );
    assert_eq!(
        api.resolve_selection(&MonthSelection::Manual(tokens(&[" feb26", "JAN26"])), now)
            .unwrap(),
        tokens(&["JAN26", "FEB26"])
    );

    assert!(matches!(
        api.resolve_selection(&MonthSelection::Preset("Q3 2026".into()), now),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        api.resolve_selection(&MonthSelection::Manual(tokens(&["13X"])), now),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_qc_manager_view() {
    let dir = workbook_dir();
    let mut api = open_api(&dir);

    let response = api
        .analyze(
            &MonthSelection::Preset("Q1 2026".into()),
            RoleView::QcManager,
            date(2026, 5, 1),
        )
        .unwrap();
    let view = response.view().unwrap();

    assert_eq!(view.title, "📋 QC Manager View");
    assert_eq!(view.report.selected_periods, tokens(&["JAN26", "FEB26"]));
    assert_eq!(view.report.summary.total_inspected, 170);
    assert_eq!(view.sections.first(), Some(&DashboardSection::SummaryMetrics));
    assert_eq!(view.sections.last(), Some(&DashboardSection::MonthlyTrends));
    assert_eq!(view.recurring_window, 6);

    let comparison = view.inspector_comparison.as_ref().unwrap();
    assert!(comparison.comparison.iter().all(|r| r.inspector != "PA/SEWING"));
    assert_eq!(comparison.excluded.len(), 1);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["role"], "QC_MANAGER");
    assert_eq!(json["report"]["red_flag_orders"][0]["order_number"], "SO-3");
}

#[test]
fn test_sewing_manager_sees_sewing_insight() {
    let dir = workbook_dir();
    let mut api = open_api(&dir);

    let response = api
        .analyze(
            &MonthSelection::Manual(tokens(&["JAN26"])),
            RoleView::SewingManager,
            date(2026, 5, 1),
        )
        .unwrap();
    let view = response.view().unwrap();

    assert_eq!(view.key_insights, vec![view.report.sewing_insight.clone()]);
    // 单月选择不展示月度趋势
    assert!(!view.sections.contains(&DashboardSection::MonthlyTrends));
}

#[test]
fn test_empty_responses() {
    let dir = workbook_dir();
    let mut api = open_api(&dir);
    let now = date(2026, 5, 1);

    let response = api
        .analyze(&MonthSelection::Manual(vec![]), RoleView::ProductionManager, now)
        .unwrap();
    match response {
        DashboardResponse::Empty { reason, message, .. } => {
            assert_eq!(reason, EmptyReason::NoPeriodsSelected);
            assert_eq!(message, "Please select at least one month");
        }
        DashboardResponse::Ready(_) => panic!("expected empty response"),
    }

    // 月份合法但工作簿中没有 → 输入错误
    assert!(matches!(
        api.analyze(
            &MonthSelection::Manual(tokens(&["JUN26"])),
            RoleView::ProductionManager,
            now,
        ),
        Err(ApiError::InvalidInput(_))
    ));

    // 工作表存在但没有数据行 → 无数据
    let dir = create_csv_workbook(&[sheet("JUN26", vec![])]).unwrap();
    let mut api = open_api(&dir);
    let response = api
        .analyze(
            &MonthSelection::Manual(tokens(&["JUN26"])),
            RoleView::ProductionManager,
            now,
        )
        .unwrap();
    match response {
        DashboardResponse::Empty {
            reason,
            sheet_failures,
            ..
        } => {
            assert_eq!(reason, EmptyReason::NoRecords);
            assert!(sheet_failures.is_empty());
        }
        DashboardResponse::Ready(_) => panic!("expected empty response"),
    }
}

#[test]
fn test_manual_months_match_mixed_case_sheets() {
    let dir = create_csv_workbook(&[
        sheet(
            "Jan26",
            vec![RowBuilder::new("SO-1", "AC-HK-BK").counts(40, 38, 2).build()],
        ),
        sheet(
            "Feb26",
            vec![RowBuilder::new("SO-2", "AC-HK-RG").counts(60, 57, 3).build()],
        ),
    ])
    .unwrap();
    let mut api = open_api(&dir);

    let response = api
        .analyze(
            &MonthSelection::Manual(tokens(&["jan26", "FEB26"])),
            RoleView::OperationsDirector,
            date(2026, 5, 1),
        )
        .unwrap();
    let report = &response.view().unwrap().report;

    assert_eq!(report.selected_periods, tokens(&["Jan26", "Feb26"]));
    assert!(report.sheet_failures.is_empty());
    assert_eq!(report.summary.total_inspected, 100);
    let trend: Vec<&str> = report.monthly_trends.iter().map(|r| r.period.as_str()).collect();
    assert_eq!(trend, vec!["Jan26", "Feb26"]);
}

#[test]
fn test_open_missing_workbook() {
    assert!(matches!(
        DashboardApi::open("/no/such/workbook.xlsx", AnalyticsConfig::default()),
        Err(ApiError::NotFound(_))
    ));
}
