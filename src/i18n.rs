// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

fn replace_args(mut text: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        text = text.replace(&placeholder, v);
    }
    text
}

/// 翻译消息（无参数，当前语言）
///
/// # 示例
/// ```no_run
/// use qc_tracker::i18n::t;
/// let msg = t("report.insights");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，当前语言）
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key).to_string(), args)
}

/// 翻译消息（带参数，指定语言）
///
/// 不修改全局语言，多个生成器可以并存
///
/// # 示例
/// ```no_run
/// use qc_tracker::i18n::t_locale_with_args;
/// let msg = t_locale_with_args("en", "insight.red_flags", &[("count", "3")]);
/// ```
pub fn t_locale_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("insight.red_flags", &[("count", "3")]);
        assert_eq!(msg, "🚩 3 customer returns (Red Flags) this period");
    }

    #[test]
    fn test_translate_explicit_locale() {
        let en = t_locale_with_args("en", "report.insights", &[]);
        let zh = t_locale_with_args("zh-CN", "report.insights", &[]);
        assert_eq!(en, "Insights");
        assert_eq!(zh, "洞察");
    }
}
