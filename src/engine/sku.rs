// ==========================================
// QC 检验分析引擎 - SKU 归一化
// ==========================================
// 职责: 完整 SKU → 父 SKU（去掉颜色段）/ 提取颜色段
// 规则:
// - TRIM 后先查例外表，命中则原样返回
// - 按 "-" 切分，丢弃颜色词表中的段，其余按原顺序用 "-" 拼接
// - 大小写敏感
// 性质: 纯函数、确定性、幂等
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 未识别到颜色段时的返回值
pub const NONE_FOUND: &str = "none found";

/// 默认颜色词表（CR 是产品线前缀，不是颜色）
pub const DEFAULT_COLOR_CODES: [&str; 17] = [
    "BK", "CB", "MC", "MA", "MB", "MT", "RG", "WD", "WG", "TB", "TD", "TJ", "RD", "ML", "NG",
    "NP", "RT",
];

/// 默认例外 SKU（看似颜色的段实为产品名的一部分）
pub const DEFAULT_EXCEPTIONS: [&str; 3] = ["PI-CB", "MI-556-TR", "MI-556-SN"];

// ==========================================
// SkuCatalog - 颜色词表 + 例外表
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuCatalog {
    pub color_codes: BTreeSet<String>,
    pub exceptions: BTreeSet<String>,
}

impl SkuCatalog {
    pub fn new<I, J, S, T>(color_codes: I, exceptions: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            color_codes: color_codes.into_iter().map(Into::into).collect(),
            exceptions: exceptions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for SkuCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_CODES, DEFAULT_EXCEPTIONS)
    }
}

/// 父 SKU
///
/// # 参数
/// - raw: 原始 SKU
/// - vocabulary: 颜色词表
/// - exceptions: 例外 SKU
pub fn parent_sku(raw: &str, vocabulary: &BTreeSet<String>, exceptions: &BTreeSet<String>) -> String {
    let sku = raw.trim();
    if exceptions.contains(sku) {
        return sku.to_string();
    }

    sku.split('-')
        .filter(|part| !vocabulary.contains(*part))
        .collect::<Vec<_>>()
        .join("-")
}

/// 颜色段（第一个命中词表的段），未命中或例外 SKU → "none found"
pub fn color_of(raw: &str, vocabulary: &BTreeSet<String>, exceptions: &BTreeSet<String>) -> String {
    let sku = raw.trim();
    if exceptions.contains(sku) {
        return NONE_FOUND.to_string();
    }

    sku.split('-')
        .find(|part| vocabulary.contains(*part))
        .unwrap_or(NONE_FOUND)
        .to_string()
}

// ==========================================
// SkuNormalizer - 绑定词表的归一化器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SkuNormalizer {
    catalog: SkuCatalog,
}

impl SkuNormalizer {
    pub fn new(catalog: SkuCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SkuCatalog {
        &self.catalog
    }

    pub fn parent_sku(&self, raw: &str) -> String {
        parent_sku(raw, &self.catalog.color_codes, &self.catalog.exceptions)
    }

    pub fn color_of(&self, raw: &str) -> String {
        color_of(raw, &self.catalog.color_codes, &self.catalog.exceptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_sku_examples() {
        let n = SkuNormalizer::default();
        assert_eq!(n.parent_sku("AC-ESE-BK"), "AC-ESE");
        assert_eq!(n.parent_sku("PC-F20-BK-LG"), "PC-F20-LG");
        assert_eq!(n.parent_sku("PI-CB"), "PI-CB");
        assert_eq!(n.parent_sku("AC-HK"), "AC-HK");
        assert_eq!(n.parent_sku("  AC-HK-RG  "), "AC-HK");
        assert_eq!(n.parent_sku("CR-100-MC"), "CR-100");
    }

    #[test]
    fn test_parent_sku_case_sensitive() {
        let n = SkuNormalizer::default();
        assert_eq!(n.parent_sku("AC-ESE-bk"), "AC-ESE-bk");
        assert_eq!(n.parent_sku("pi-cb"), "pi");
    }

    #[test]
    fn test_parent_sku_idempotent() {
        let n = SkuNormalizer::default();
        for raw in ["AC-ESE-BK", "PC-F20-BK-LG", "PI-CB", "MI-556-TR", "BK-RG", "", "X--BK"] {
            let once = n.parent_sku(raw);
            assert_eq!(n.parent_sku(&once), once, "raw = {}", raw);
        }
    }

    #[test]
    fn test_exceptions_preserved() {
        let n = SkuNormalizer::default();
        for raw in DEFAULT_EXCEPTIONS {
            assert_eq!(n.parent_sku(raw), raw);
            assert_eq!(n.color_of(raw), NONE_FOUND);
        }
    }

    #[test]
    fn test_color_of() {
        let n = SkuNormalizer::default();
        assert_eq!(n.color_of("AC-ESE-BK"), "BK");
        assert_eq!(n.color_of("PC-F20-RG-BK"), "RG");
        assert_eq!(n.color_of("AC-HK"), NONE_FOUND);
    }

    #[test]
    fn test_custom_catalog() {
        let n = SkuNormalizer::new(SkuCatalog::new(["XX"], Vec::<String>::new()));
        assert_eq!(n.parent_sku("AC-XX-BK"), "AC-BK");
        assert_eq!(n.color_of("AC-XX-BK"), "XX");
    }
}
