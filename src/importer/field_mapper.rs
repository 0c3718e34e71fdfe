// ==========================================
// QC 检验分析引擎 - 字段映射器实现
// ==========================================
// 职责: 按列结构把数据行映射为检验记录 + 类型转换
// ==========================================

use crate::domain::{CellValue, DqLevel, DqNote, InspectionRecord};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::RecordMapper;
use crate::importer::schema::{ColumnSchema, RecordField};

static EMPTY_CELL: CellValue = CellValue::Empty;

pub struct FieldMapper {
    schema: ColumnSchema,
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            cleaner: DataCleaner,
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// 取字段对应单元格（列不存在或行过短 → 空单元格）
    fn cell<'a>(&self, row: &'a [CellValue], field: RecordField) -> &'a CellValue {
        self.schema
            .column_of(field)
            .and_then(|col| row.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    fn text(&self, row: &[CellValue], field: RecordField) -> String {
        self.cleaner.clean_text(self.cell(row, field))
    }

    /// 计数字段；负数置 0 并记录 DQ 提示
    fn count(
        &self,
        row: &[CellValue],
        field: RecordField,
        ctx: &RowContext<'_>,
        notes: &mut Vec<DqNote>,
    ) -> u64 {
        let cleaned = self.cleaner.clean_count(self.cell(row, field));
        if cleaned.was_negative {
            notes.push(DqNote {
                sheet: ctx.period.to_string(),
                row_number: ctx.row_number,
                order_number: Some(ctx.order_number.to_string()),
                level: DqLevel::Warning,
                field: field.header().to_string(),
                message: format!(
                    "负数已置 0: {}",
                    self.cell(row, field).as_text().trim()
                ),
            });
        }
        cleaned.value
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(ColumnSchema::default())
    }
}

struct RowContext<'a> {
    period: &'a str,
    row_number: usize,
    order_number: &'a str,
}

impl RecordMapper for FieldMapper {
    fn required_width(&self) -> usize {
        self.schema.required_width()
    }

    fn map_row(
        &self,
        row: &[CellValue],
        row_number: usize,
        period: &str,
    ) -> Option<(InspectionRecord, Vec<DqNote>)> {
        // 主键: 订单号为空则整行丢弃
        let order_number = self.text(row, RecordField::OrderNumber);
        if order_number.is_empty() {
            return None;
        }

        let ctx = RowContext {
            period,
            row_number,
            order_number: &order_number,
        };
        let mut notes = Vec::new();

        let quantity = self.count(row, RecordField::Quantity, &ctx, &mut notes);
        let repairs = self.count(row, RecordField::Repairs, &ctx, &mut notes);
        let scrap = self.count(row, RecordField::Scrap, &ctx, &mut notes);
        let final_qty = self.count(row, RecordField::FinalQty, &ctx, &mut notes);
        let qc_fail = self.count(row, RecordField::QcFail, &ctx, &mut notes);
        let sewing_fail = self.count(row, RecordField::SewingFail, &ctx, &mut notes);

        let record = InspectionRecord {
            // 标识
            order_number: order_number.clone(),
            lot_number: self.text(row, RecordField::LotNumber),

            // 交期
            due_date: self.cleaner.parse_date(self.cell(row, RecordField::DueDate)),
            finished_date: self
                .cleaner
                .parse_date(self.cell(row, RecordField::FinishedDate)),

            // 产品
            sku: self.text(row, RecordField::Sku),

            // 检验数量
            quantity,
            repairs,
            repair_pct: self
                .cleaner
                .parse_percent(self.cell(row, RecordField::RepairPct)),
            scrap,
            pass_pct: self.cleaner.parse_percent(self.cell(row, RecordField::PassPct)),
            final_qty,

            // 责任人与标记
            inspector: self.text(row, RecordField::Inspector),
            red_flag: self.cleaner.clean_flag(self.cell(row, RecordField::RedFlag)),
            ncr_complete: self
                .cleaner
                .clean_flag(self.cell(row, RecordField::NcrComplete)),

            // 缺陷发现环节
            qc_fail,
            sewing_fail,

            // 其他
            stream: self.text(row, RecordField::Stream),
            notes: self.text(row, RecordField::Notes),
            period: period.to_string(),
        };

        Some((record, notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_row() -> Vec<CellValue> {
        vec![
            CellValue::from("  SO-1001 "),
            CellValue::from("LOT-7"),
            CellValue::from("2026-01-10"),
            CellValue::from(NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()),
            CellValue::from("PC-F20-BK-LG"),
            CellValue::Number(100.0),
            CellValue::Number(3.0),
            CellValue::from("n/a"),
            CellValue::Number(5.0),
            CellValue::Number(0.95),
            CellValue::Number(95.0),
            CellValue::from(" ANA "),
            CellValue::from("x"),
            CellValue::Empty,
            CellValue::Number(2.0),
            CellValue::Number(3.0),
            CellValue::from("SS"),
            CellValue::from("nan"),
        ]
    }

    #[test]
    fn test_field_mapper_basic() {
        let mapper = FieldMapper::default();
        let (record, notes) = mapper.map_row(&full_row(), 1, "JAN26").unwrap();

        assert!(notes.is_empty());
        assert_eq!(record.order_number, "SO-1001");
        assert_eq!(record.lot_number, "LOT-7");
        assert_eq!(record.due_date, NaiveDate::from_ymd_opt(2026, 1, 10));
        assert_eq!(record.finished_date, NaiveDate::from_ymd_opt(2026, 1, 12));
        assert_eq!(record.sku, "PC-F20-BK-LG");
        assert_eq!(record.quantity, 100);
        assert_eq!(record.repairs, 3);
        assert_eq!(record.repair_pct, None);
        assert_eq!(record.scrap, 5);
        assert_eq!(record.pass_pct, Some(0.95));
        assert_eq!(record.final_qty, 95);
        assert_eq!(record.inspector, "ANA");
        assert!(record.red_flag);
        assert!(!record.ncr_complete);
        assert_eq!(record.qc_fail, 2);
        assert_eq!(record.sewing_fail, 3);
        assert_eq!(record.stream, "SS");
        assert_eq!(record.notes, "");
        assert_eq!(record.period, "JAN26");
    }

    #[test]
    fn test_field_mapper_blank_order_dropped() {
        let mapper = FieldMapper::default();
        let mut row = full_row();
        row[0] = CellValue::from("   ");
        assert!(mapper.map_row(&row, 2, "JAN26").is_none());
    }

    #[test]
    fn test_field_mapper_short_row_defaults() {
        let mapper = FieldMapper::default();
        let row = vec![CellValue::from("SO-9"), CellValue::Empty, CellValue::Empty];
        let (record, _) = mapper.map_row(&row, 3, "FEB26").unwrap();

        assert_eq!(record.quantity, 0);
        assert_eq!(record.due_date, None);
        assert_eq!(record.pass_pct, None);
        assert!(!record.red_flag);
        assert_eq!(record.inspector, "");
    }

    #[test]
    fn test_field_mapper_negative_count_noted() {
        let mapper = FieldMapper::default();
        let mut row = full_row();
        row[8] = CellValue::Number(-4.0);
        let (record, notes) = mapper.map_row(&row, 4, "JAN26").unwrap();

        assert_eq!(record.scrap, 0);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].field, "Scrap");
        assert_eq!(notes[0].row_number, 4);
        assert_eq!(notes[0].level, DqLevel::Warning);
    }
}
