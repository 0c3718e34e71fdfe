// ==========================================
// QC 检验分析引擎 - 月度工作表导入器
// ==========================================
// 职责: 月度工作表识别 / 单表加载 / 多表拼接
// 流程: 读取 → 列数检查 → 映射 + 清洗 → DQ 校验
// 红线: 单个工作表失败只记录为 SheetOutcome::Failed，不中断其他工作表
// ==========================================

use crate::domain::{DqNote, InspectionRecord, RawSheet};
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::importer_trait::{RecordMapper, WorkbookSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// 非月度工作表的名称标记
const EXCLUDED_SHEET_MARKERS: [&str; 2] = ["Reference", "KPI"];

/// 是否为月度工作表（MMMYY，如 "JAN26"）
pub fn is_monthly_sheet(name: &str) -> bool {
    let chars: Vec<char> = name.chars().collect();
    chars.len() == 5
        && chars[..3].iter().all(|c| c.is_alphabetic())
        && chars[3..].iter().all(|c| c.is_ascii_digit())
        && !EXCLUDED_SHEET_MARKERS.iter().any(|m| name.contains(m))
}

/// 工作簿中的月度工作表（保持工作簿原始顺序）
pub fn monthly_sheets(source: &dyn WorkbookSource) -> Vec<String> {
    source
        .sheet_names()
        .into_iter()
        .filter(|name| is_monthly_sheet(name))
        .collect()
}

// ==========================================
// 导入结果类型
// ==========================================

/// 单个工作表的加载结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Loaded { sheet: String, rows: usize },
    Failed { sheet: String, reason: String },
}

impl SheetOutcome {
    pub fn sheet(&self) -> &str {
        match self {
            SheetOutcome::Loaded { sheet, .. } | SheetOutcome::Failed { sheet, .. } => sheet,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SheetOutcome::Failed { .. })
    }
}

/// 加载失败的工作表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFailure {
    pub sheet: String,
    pub reason: String,
}

/// 单表加载结果（含 DQ 提示）
#[derive(Debug, Clone, Default)]
pub struct LoadedSheet {
    pub records: Vec<InspectionRecord>,
    pub dq_notes: Vec<DqNote>,
}

/// 多表导入报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionReport {
    pub batch_id: String,
    pub records: Vec<InspectionRecord>,
    pub outcomes: Vec<SheetOutcome>,
    pub dq_notes: Vec<DqNote>,
}

impl IngestionReport {
    /// 失败的工作表（按加载顺序）
    pub fn failures(&self) -> Vec<SheetFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                SheetOutcome::Failed { sheet, reason } => Some(SheetFailure {
                    sheet: sheet.clone(),
                    reason: reason.clone(),
                }),
                SheetOutcome::Loaded { .. } => None,
            })
            .collect()
    }

    /// 每个成功工作表的记录数
    pub fn rows_by_sheet(&self) -> Vec<(String, usize)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                SheetOutcome::Loaded { sheet, rows } => Some((sheet.clone(), *rows)),
                SheetOutcome::Failed { .. } => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// SheetImporter
// ==========================================
pub struct SheetImporter {
    mapper: Box<dyn RecordMapper>,
    dq_validator: DqValidator,
}

impl SheetImporter {
    pub fn new(mapper: Box<dyn RecordMapper>) -> Self {
        Self {
            mapper,
            dq_validator: DqValidator,
        }
    }

    /// 加载单个工作表
    pub fn load_sheet(&self, sheet: &RawSheet) -> ImportResult<Vec<InspectionRecord>> {
        Ok(self.load_sheet_with_quality(sheet)?.records)
    }

    /// 加载单个工作表（附带 DQ 提示）
    ///
    /// # 返回
    /// - Ok(LoadedSheet): 第 0 行（表头）与订单号为空的行已丢弃
    /// - Err(SchemaMismatch): 非空工作表列数少于列结构要求
    pub fn load_sheet_with_quality(&self, sheet: &RawSheet) -> ImportResult<LoadedSheet> {
        if sheet.is_empty() {
            return Ok(LoadedSheet::default());
        }

        let expected = self.mapper.required_width();
        let found = sheet.width();
        if found < expected {
            return Err(ImportError::SchemaMismatch {
                sheet: sheet.name.clone(),
                expected,
                found,
            });
        }

        let mut loaded = LoadedSheet::default();
        let mut dropped = 0usize;
        for (row_number, row) in sheet.rows.iter().enumerate().skip(1) {
            match self.mapper.map_row(row, row_number, &sheet.name) {
                Some((record, notes)) => {
                    loaded.dq_notes.extend(notes);
                    loaded
                        .dq_notes
                        .extend(self.dq_validator.validate_record(&record, row_number));
                    loaded.records.push(record);
                }
                None => dropped += 1,
            }
        }

        debug!(
            sheet = %sheet.name,
            records = loaded.records.len(),
            dropped = dropped,
            dq_notes = loaded.dq_notes.len(),
            "工作表加载完成"
        );
        Ok(loaded)
    }

    /// 按顺序加载多个工作表并拼接
    ///
    /// # 参数
    /// - source: 工作簿数据源
    /// - sheets: 工作表名称（按给定顺序加载）
    ///
    /// # 返回
    /// - IngestionReport: 全部失败或输入为空时记录为空，不返回错误
    pub fn load_all(&self, source: &mut dyn WorkbookSource, sheets: &[String]) -> IngestionReport {
        let batch_id = Uuid::new_v4().to_string();
        let span = info_span!("ingestion", batch_id = %batch_id);
        let _guard = span.enter();

        info!(sheets = sheets.len(), "开始加载月度工作表");

        let mut report = IngestionReport {
            batch_id: batch_id.clone(),
            ..Default::default()
        };

        for name in sheets {
            let result = source
                .read_sheet(name)
                .and_then(|sheet| self.load_sheet_with_quality(&sheet));

            match result {
                Ok(loaded) => {
                    report.outcomes.push(SheetOutcome::Loaded {
                        sheet: name.clone(),
                        rows: loaded.records.len(),
                    });
                    report.records.extend(loaded.records);
                    report.dq_notes.extend(loaded.dq_notes);
                }
                Err(e) => {
                    warn!(sheet = %name, error = %e, "工作表加载失败，已跳过");
                    report.outcomes.push(SheetOutcome::Failed {
                        sheet: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            records = report.records.len(),
            failed = report.outcomes.iter().filter(|o| o.is_failed()).count(),
            dq_notes = report.dq_notes.len(),
            "月度工作表加载完成"
        );
        report
    }
}

impl Default for SheetImporter {
    fn default() -> Self {
        Self::new(Box::new(FieldMapper::default()))
    }
}
