// ==========================================
// QC 检验分析引擎 - 月度记录缓存
// ==========================================
// 职责: 单次请求内按月份缓存已加载的记录
// 用途: 重复问题 SKU 扫描会逐月重新加载回看窗口内的工作表
// 说明: 失败的月份不缓存（下次仍会重试并返回错误）
// ==========================================

use crate::domain::InspectionRecord;
use crate::importer::error::ImportResult;
use crate::importer::importer_trait::WorkbookSource;
use crate::importer::sheet_importer::SheetImporter;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PeriodCache {
    entries: HashMap<String, Vec<InspectionRecord>>,
}

impl PeriodCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取某个月份的记录（未缓存时从数据源加载）
    pub fn get_or_load(
        &mut self,
        period: &str,
        source: &mut dyn WorkbookSource,
        importer: &SheetImporter,
    ) -> ImportResult<&[InspectionRecord]> {
        if !self.entries.contains_key(period) {
            let sheet = source.read_sheet(period)?;
            let records = importer.load_sheet(&sheet)?;
            debug!(period = period, records = records.len(), "月份记录已缓存");
            self.entries.insert(period.to_string(), records);
        }

        Ok(self
            .entries
            .get(period)
            .map(|r| r.as_slice())
            .unwrap_or(&[]))
    }

    /// 预先放入已加载的记录
    pub fn insert(&mut self, period: impl Into<String>, records: Vec<InspectionRecord>) {
        self.entries.insert(period.into(), records);
    }

    pub fn contains(&self, period: &str) -> bool {
        self.entries.contains_key(period)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
