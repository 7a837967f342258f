//! 文案模板的随机选择

/// 从 `len` 个候选中选出一个下标
///
/// 生产环境使用线程本地随机数，测试中用 [`FixedPicker`] 固定结果。
pub trait TemplatePicker: Send + Sync {
    /// `len` 大于 0；返回值必须小于 `len`
    fn pick(&self, len: usize) -> usize;
}

/// 基于线程本地 RNG 的均匀选择
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl TemplatePicker for ThreadRngPicker {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::random_range(0..len)
    }
}

/// 固定下标（对候选数取模）
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl TemplatePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.0 % len }
    }
}

/// 按 picker 的结果从模板表中取一项
pub fn choose<'a>(picker: &dyn TemplatePicker, templates: &[&'a str]) -> &'a str {
    match templates.len() {
        0 => "",
        len => templates[picker.pick(len).min(len - 1)],
    }
}
