//! 只用“是/否/取消”三态对话框完成列表选择
//!
//! 选项不超过 3 个时直接枚举，更多时二分缩小范围，最多 `ceil(log2 N) + 1` 轮。
//! 任何一轮取消都会丢弃已缩小的范围并返回 `None`。

use tracing::debug;

/// 对话框的回答
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

/// 三态对话框
pub trait TernaryPrompt {
    /// `cancellable` 为 false 时只提供是/否两个按钮
    fn ask(&mut self, title: &str, message: &str, cancellable: bool) -> Answer;
}

impl<P: TernaryPrompt + ?Sized> TernaryPrompt for &mut P {
    fn ask(&mut self, title: &str, message: &str, cancellable: bool) -> Answer {
        (**self).ask(title, message, cancellable)
    }
}

/// 一个可选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// 列表选择器
///
/// 宿主有真正的列表控件时换成另一个实现即可，调用方不受影响。
pub trait Chooser {
    /// 返回选中项的 id，取消时返回 `None`
    fn choose(&mut self, title: &str, options: &[Choice]) -> Option<String>;

    /// 是/否确认
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// 仅用于展示的消息
    fn notify(&mut self, title: &str, message: &str);
}

/// 基于三态对话框的选择器
pub struct TernaryChooser<P> {
    prompt: P,
}

impl<P: TernaryPrompt> TernaryChooser<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    pub fn into_inner(self) -> P {
        self.prompt
    }
}

impl<P: TernaryPrompt> Chooser for TernaryChooser<P> {
    fn choose(&mut self, title: &str, options: &[Choice]) -> Option<String> {
        choose(title, options, &mut self.prompt)
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.prompt.ask(title, message, false) == Answer::Yes
    }

    fn notify(&mut self, title: &str, message: &str) {
        // 只有一个“确定”按钮，回答无关紧要
        let _ = self.prompt.ask(title, message, false);
    }
}

/// 按 1 起始编号列出 `options[lo-1..=hi-1]`
fn numbered(options: &[Choice], lo: usize, hi: usize) -> String {
    (lo..=hi)
        .map(|i| format!("{}. {}", i, options[i - 1].label))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 在两个相邻选项之间做最终选择，不提供取消
fn pick_pair(title: &str, options: &[Choice], lo: usize, prompt: &mut dyn TernaryPrompt) -> String {
    let hi = lo + 1;
    let message = format!(
        "Select one:\n\n{}\n\nClick 'Yes' for {}\nClick 'No' for {}",
        numbered(options, lo, hi),
        lo,
        hi
    );
    // 非 Yes 的回答都视为 No
    let index = match prompt.ask(title, &message, false) {
        Answer::Yes => lo,
        Answer::No | Answer::Cancel => hi,
    };
    options[index - 1].id.clone()
}

/// 选择协议本体
pub fn choose(title: &str, options: &[Choice], prompt: &mut dyn TernaryPrompt) -> Option<String> {
    match options.len() {
        0 => None,
        1 => Some(options[0].id.clone()),
        2 => {
            let message = format!(
                "{}\n\nClick 'Yes' for 1\nClick 'No' for 2\nClick 'Cancel' to exit",
                numbered(options, 1, 2)
            );
            match prompt.ask(title, &message, true) {
                Answer::Yes => Some(options[0].id.clone()),
                Answer::No => Some(options[1].id.clone()),
                Answer::Cancel => None,
            }
        }
        3 => {
            let message = format!(
                "{}\n\nClick 'Yes' for 1\nClick 'No' for 2-3\nClick 'Cancel' to exit",
                numbered(options, 1, 3)
            );
            match prompt.ask(title, &message, true) {
                Answer::Yes => Some(options[0].id.clone()),
                Answer::No => Some(pick_pair(title, options, 2, prompt)),
                Answer::Cancel => None,
            }
        }
        n => binary_search(title, options, 1, n, prompt),
    }
}

fn binary_search(
    title: &str,
    options: &[Choice],
    mut lo: usize,
    mut hi: usize,
    prompt: &mut dyn TernaryPrompt,
) -> Option<String> {
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        let message = format!(
            "Is your choice number {mid} or lower?\n\n{lo}-{mid}:\n{}\n\n{}-{hi}:\n{}\n\n\
             Click 'Yes' for {lo}-{mid}\nClick 'No' for {}-{hi}\nClick 'Cancel' to exit",
            numbered(options, lo, mid),
            mid + 1,
            numbered(options, mid + 1, hi),
            mid + 1,
        );

        match prompt.ask(title, &message, true) {
            Answer::Yes => hi = mid,
            Answer::No => lo = mid + 1,
            Answer::Cancel => {
                debug!("Selection cancelled while narrowing {}-{}", lo, hi);
                return None;
            }
        }
    }

    if lo == hi {
        Some(options[lo - 1].id.clone())
    } else {
        Some(pick_pair(title, options, lo, prompt))
    }
}
