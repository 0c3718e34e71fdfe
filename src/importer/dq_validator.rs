// ==========================================
// QC 检验分析引擎 - 数据质量校验器实现
// ==========================================
// 职责: 记录级一致性校验（只提示，不修正，不剔除）
// 规则: final / scrap / repairs 不应超过检验数量，
//       否则比率可能超出 [0, 100]
// ==========================================

use crate::domain::{DqLevel, DqNote, InspectionRecord};

pub struct DqValidator;

impl DqValidator {
    /// 校验单条记录
    ///
    /// # 参数
    /// - record: 已映射的检验记录
    /// - row_number: 工作表内行号
    ///
    /// # 返回
    /// - Vec<DqNote>: 违规提示（可能为空）
    pub fn validate_record(&self, record: &InspectionRecord, row_number: usize) -> Vec<DqNote> {
        let mut notes = Vec::new();

        let checks = [
            ("Final_Qty", record.final_qty),
            ("Scrap", record.scrap),
            ("Repairs", record.repairs),
        ];

        for (field, value) in checks {
            if value > record.quantity {
                notes.push(DqNote {
                    sheet: record.period.clone(),
                    row_number,
                    order_number: Some(record.order_number.clone()),
                    level: DqLevel::Warning,
                    field: field.to_string(),
                    message: format!("{} 超过检验数量: {} > {}", field, value, record.quantity),
                });
            }
        }

        if record.due_date.is_none() {
            notes.push(DqNote {
                sheet: record.period.clone(),
                row_number,
                order_number: Some(record.order_number.clone()),
                level: DqLevel::Info,
                field: "Due_Date".to_string(),
                message: "交期缺失，不计入准时率".to_string(),
            });
        }

        notes
    }
}
