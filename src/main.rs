// ==========================================
// QC 检验分析引擎 - 命令行入口
// ==========================================
// 子命令: periods / presets / report
// 输出: 文本（按角色板块）或 JSON
// ==========================================

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use qc_tracker::api::{DashboardApi, DashboardResponse, DashboardSection, DashboardView, MonthSelection};
use qc_tracker::config::{config_keys, AnalyticsConfigReader, ConfigManager};
use qc_tracker::i18n::t_locale_with_args;
use qc_tracker::{logging, RoleView};

#[derive(Parser)]
#[command(name = "qc-tracker", version, about = "QC inspection tracker analytics")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List monthly sheets in calendar order
    Periods {
        /// Excel workbook, CSV file or directory of CSV sheets
        workbook: PathBuf,
    },

    /// List quarter / year-to-date presets
    Presets {
        workbook: PathBuf,
    },

    /// Analyze the selected months
    Report {
        workbook: PathBuf,

        /// Comma-separated month tokens, e.g. JAN26,FEB26
        #[arg(long, value_delimiter = ',', conflicts_with = "preset")]
        months: Vec<String>,

        /// Preset label, e.g. "Q1 2026" or "YTD 2026"
        #[arg(long)]
        preset: Option<String>,

        #[arg(long, default_value = "production-manager")]
        role: RoleView,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// JSON file with threshold overrides
        #[arg(long)]
        config: Option<PathBuf>,

        /// Insight language (en, zh-CN)
        #[arg(long)]
        locale: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::debug!(version = qc_tracker::VERSION, "{}", qc_tracker::APP_NAME);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    match command {
        Commands::Periods { workbook } => {
            let api = DashboardApi::open(&workbook, Default::default())
                .with_context(|| format!("无法打开工作簿: {}", workbook.display()))?;
            for period in api.available_periods() {
                println!("{period}");
            }
        }
        Commands::Presets { workbook } => {
            let api = DashboardApi::open(&workbook, Default::default())
                .with_context(|| format!("无法打开工作簿: {}", workbook.display()))?;
            for preset in api.presets(today) {
                println!("{:<10} {}", preset.label, preset.periods.join(","));
            }
        }
        Commands::Report {
            workbook,
            months,
            preset,
            role,
            format,
            config,
            locale,
        } => {
            let mut manager = match config {
                Some(path) => ConfigManager::from_json_file(&path)
                    .with_context(|| format!("无法读取配置: {}", path.display()))?,
                None => ConfigManager::new(),
            };
            if let Some(locale) = locale {
                manager.set(config_keys::LOCALE, locale);
            }
            let analytics_config = manager.load_analytics_config();
            let locale = analytics_config.locale.clone();

            let selection = match (preset, months.is_empty()) {
                (Some(label), _) => MonthSelection::Preset(label),
                (None, false) => MonthSelection::Manual(months),
                (None, true) => MonthSelection::Latest,
            };

            let mut api = DashboardApi::open(&workbook, analytics_config)
                .with_context(|| format!("无法打开工作簿: {}", workbook.display()))?;
            let response = api.analyze(&selection, role, today)?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => match &response {
                    DashboardResponse::Ready(view) => print!("{}", render_text(view, &locale)),
                    DashboardResponse::Empty {
                        message,
                        sheet_failures,
                        ..
                    } => {
                        for failure in sheet_failures {
                            eprintln!(
                                "{}",
                                t_locale_with_args(
                                    &locale,
                                    "report.sheet_failed",
                                    &[("sheet", failure.sheet.as_str()), ("reason", failure.reason.as_str())],
                                )
                            );
                        }
                        bail!("{message}");
                    }
                },
            }
        }
    }

    Ok(())
}

// ==========================================
// 文本渲染
// ==========================================

fn render_text(view: &DashboardView, locale: &str) -> String {
    let tr = |key: &str, args: &[(&str, &str)]| t_locale_with_args(locale, key, args);
    let report = &view.report;
    let mut out = String::new();

    out.push_str(&format!("{}\n", view.title));
    out.push_str(&format!(
        "{}\n",
        tr("report.analyzing", &[("periods", report.selected_periods.join(", ").as_str())])
    ));
    for failure in &report.sheet_failures {
        out.push_str(&format!(
            "{}\n",
            tr(
                "report.sheet_failed",
                &[("sheet", failure.sheet.as_str()), ("reason", failure.reason.as_str())]
            )
        ));
    }

    for section in &view.sections {
        out.push_str(&format!("\n#### {}\n", tr(section.title_key(), &[])));
        for line in section_lines(*section, view, locale) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn section_lines(section: DashboardSection, view: &DashboardView, locale: &str) -> Vec<String> {
    let tr = |key: &str, args: &[(&str, &str)]| t_locale_with_args(locale, key, args);
    let label = |key: &str, value: String| format!("  {}: {}", tr(key, &[]), value);
    let report = &view.report;
    let s = &report.summary;

    let or_empty = |lines: Vec<String>, empty_key: &str| {
        if lines.is_empty() {
            vec![format!("  {}", tr(empty_key, &[]))]
        } else {
            lines
        }
    };

    match section {
        DashboardSection::SummaryMetrics => vec![
            label("label.pass_rate", format!("{:.1}%", s.pass_rate)),
            label("label.fail_rate", format!("{:.1}%", s.fail_rate)),
            label("label.repair_rate", format!("{:.1}%", s.repair_rate)),
            label("label.scrap_rate", format!("{:.1}%", s.scrap_rate)),
            label("label.total_inspected", s.total_inspected.to_string()),
            label("label.total_orders", s.total_orders.to_string()),
            label("label.total_fails", s.total_fails.to_string()),
            label("label.total_repairs", s.total_repairs.to_string()),
            label("label.total_scrap", s.total_scrap.to_string()),
            label("label.red_flags", s.total_red_flags.to_string()),
        ],
        DashboardSection::OnTimeDelivery => {
            let o = &report.on_time;
            let mut lines = vec![
                label("label.on_time_rate", format!("{:.1}%", o.on_time_rate)),
                label("label.late_orders", o.total_late_orders.to_string()),
                label("label.total_days_late", o.total_days_late.to_string()),
                label("label.avg_days_late", format!("{:.1}", o.avg_days_late)),
            ];
            if o.orders_missing_due_date > 0 {
                lines.push(format!(
                    "  {}",
                    tr(
                        "report.missing_due_date",
                        &[("count", o.orders_missing_due_date.to_string().as_str())]
                    )
                ));
            }
            lines
        }
        DashboardSection::KeyInsights | DashboardSection::ExecutiveSummary => {
            view.key_insights.iter().map(|i| format!("  - {i}")).collect()
        }
        DashboardSection::ProblemSkusByCount | DashboardSection::SkusRequiringAttention => {
            let lines = report
                .problem_skus
                .by_fail_count
                .iter()
                .map(|r| {
                    format!(
                        "  {:<16} qty={:<6} fails={:<5} rate={:.2}% repairs={}",
                        r.parent_sku, r.quantity, r.total_fails, r.fail_rate, r.repairs
                    )
                })
                .collect();
            or_empty(lines, "report.no_data")
        }
        DashboardSection::ProblemSkusByRate => {
            let lines = report
                .problem_skus
                .by_fail_rate
                .iter()
                .map(|r| {
                    format!(
                        "  {:<16} qty={:<6} fails={:<5} rate={:.2}%",
                        r.parent_sku, r.quantity, r.total_fails, r.fail_rate
                    )
                })
                .collect();
            or_empty(lines, "report.no_data")
        }
        DashboardSection::TopRepairSkus | DashboardSection::RepairsByParentSku => {
            let rows = if section == DashboardSection::TopRepairSkus {
                &report.top_repair_skus
            } else {
                &report.repairs_by_parent_sku
            };
            let lines = rows
                .iter()
                .map(|r| {
                    format!(
                        "  {:<16} qty={:<6} repairs={:<5} rate={:.2}%",
                        r.parent_sku, r.quantity, r.repairs, r.repair_rate
                    )
                })
                .collect();
            or_empty(lines, "report.no_repairs")
        }
        DashboardSection::InspectorSummary => report
            .inspector_performance
            .iter()
            .map(|r| {
                format!(
                    "  {:<20} qty={:<6} pass={:.2}% fails={}",
                    r.inspector, r.quantity, r.pass_rate, r.total_fails
                )
            })
            .collect(),
        DashboardSection::MonthOverMonthTrends => report
            .monthly_trends_extended
            .iter()
            .map(|r| {
                format!(
                    "  {:<6} ncr={:<4} fails={:<5} reworks={:<5} touch={:.2}%",
                    r.base.period, r.ncr_count, r.base.total_fails, r.total_reworks, r.touch_rate
                )
            })
            .collect(),
        DashboardSection::QualityDistribution => vec![
            label("label.passed", s.total_passed.to_string()),
            label("label.scrapped", s.total_scrap.to_string()),
        ],
        DashboardSection::RedFlags => {
            let lines = report
                .red_flags
                .iter()
                .take(10)
                .map(|r| {
                    format!(
                        "  {:<16} orders={:<4} flags={}",
                        r.parent_sku, r.orders, r.red_flag_count
                    )
                })
                .collect();
            or_empty(lines, "report.no_red_flags")
        }
        DashboardSection::ConcentrationAlerts => report
            .concentration_alerts
            .iter()
            .map(|a| {
                format!(
                    "  {:<20} {:<16} {:.1}% ({}/{})",
                    a.inspector,
                    a.parent_sku,
                    a.concentration_pct,
                    a.inspector_sku_orders,
                    a.total_sku_orders
                )
            })
            .collect(),
        DashboardSection::InspectorComparison => {
            let rows = view
                .inspector_comparison
                .as_ref()
                .map(|c| c.comparison.as_slice())
                .unwrap_or_default();
            let lines = rows
                .iter()
                .map(|r| {
                    format!(
                        "  {:<20} qty={:<6} pass={:.2}% fails={:<4} qc={:<4} sewing={:<4} repairs={:<4} flags={}",
                        r.inspector,
                        r.quantity,
                        r.pass_rate,
                        r.total_fails,
                        r.qc_fail,
                        r.sewing_fail,
                        r.repairs,
                        r.red_flags
                    )
                })
                .collect();
            or_empty(lines, "report.no_data")
        }
        DashboardSection::ExcludedInspectors => view
            .inspector_comparison
            .as_ref()
            .map(|c| c.excluded.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|r| format!("  {:<20} qty={:<6} repairs={}", r.inspector, r.quantity, r.repairs))
            .collect(),
        DashboardSection::RedFlagOrders => {
            let lines = report
                .red_flag_orders
                .iter()
                .map(|r| {
                    format!(
                        "  {:<12} {:<18} {:<16} qty={:<5} ncr={}",
                        r.order_number,
                        r.sku,
                        r.inspector,
                        r.quantity,
                        if r.ncr_complete { "X" } else { "-" }
                    )
                })
                .collect();
            or_empty(lines, "report.no_red_flags")
        }
        DashboardSection::DefectDetection => vec![label(
            "label.sewing_detection_rate",
            format!("{:.1}%", s.sewing_detection_rate),
        )],
        DashboardSection::SewingQuality => vec![
            label("label.sewing_fails", s.total_sewing_fails.to_string()),
            label("label.qc_fails", s.total_qc_fails.to_string()),
            label(
                "label.sewing_detection_rate",
                format!("{:.1}%", s.sewing_detection_rate),
            ),
        ],
        DashboardSection::RecurringSkus => {
            let lines = report
                .recurring_skus
                .iter()
                .map(|r| {
                    format!(
                        "  {:<16} months={} ({})",
                        r.parent_sku,
                        r.months_in_top,
                        r.months.join(", ")
                    )
                })
                .collect();
            let window = view.recurring_window.to_string();
            if report.recurring_skus.is_empty() {
                vec![format!("  {}", tr("report.no_recurring", &[("window", window.as_str())]))]
            } else {
                lines
            }
        }
        DashboardSection::SewingFails => {
            let lines = report
                .sewing_issues
                .iter()
                .map(|r| {
                    format!(
                        "  {:<16} qty={:<6} sewing={:<5} rate={:.2}%",
                        r.parent_sku, r.quantity, r.sewing_fail, r.sewing_fail_rate
                    )
                })
                .collect();
            or_empty(lines, "report.no_sewing_fails")
        }
        DashboardSection::MonthlyTrends => report
            .monthly_trends
            .iter()
            .map(|r| {
                format!(
                    "  {:<6} qty={:<6} pass={:.2}% fail={:.2}% repair={:.2}%",
                    r.period, r.quantity, r.pass_rate, r.fail_rate, r.repair_rate
                )
            })
            .collect(),
    }
}
