//! 终端交互：三态对话框、编号列表选择和进度显示

use crate::core::{Answer, Choice, Chooser, ProgressReporter, TernaryPrompt};
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 基于行输入的终端
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// 读取一行，输入结束或读取失败时返回 `None`
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                debug!("Failed to read console input: {}", e);
                None
            }
        }
    }

    fn show(&mut self, title: &str, message: &str) {
        let _ = writeln!(self.output, "\n== {} ==\n{}", title, message);
    }

    fn ask_line(&mut self, hint: &str) -> Option<String> {
        let _ = write!(self.output, "{} ", hint);
        let _ = self.output.flush();
        self.read_line()
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> TernaryPrompt for Console<R, W> {
    fn ask(&mut self, title: &str, message: &str, cancellable: bool) -> Answer {
        self.show(title, message);
        let hint = if cancellable {
            "[y]es / [n]o / [c]ancel:"
        } else {
            "[y]es / [n]o:"
        };

        loop {
            let Some(line) = self.ask_line(hint) else {
                return Answer::Cancel;
            };
            match line.to_lowercase().as_str() {
                "y" | "yes" => return Answer::Yes,
                "n" | "no" => return Answer::No,
                "c" | "cancel" if cancellable => return Answer::Cancel,
                _ => continue,
            }
        }
    }
}

/// 输入编号直接选择
pub struct ListChooser<'a, R, W> {
    console: &'a mut Console<R, W>,
}

impl<'a, R: BufRead, W: Write> ListChooser<'a, R, W> {
    pub fn new(console: &'a mut Console<R, W>) -> Self {
        Self { console }
    }
}

impl<R: BufRead, W: Write> Chooser for ListChooser<'_, R, W> {
    fn choose(&mut self, title: &str, options: &[Choice]) -> Option<String> {
        if options.is_empty() {
            return None;
        }

        let listing = options
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c.label))
            .collect::<Vec<_>>()
            .join("\n");
        self.console.show(title, &listing);

        let hint = format!("Enter 1-{} (empty to cancel):", options.len());
        loop {
            let line = self.console.ask_line(&hint)?;
            if line.is_empty() || line.eq_ignore_ascii_case("c") {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Some(options[n - 1].id.clone()),
                _ => continue,
            }
        }
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        self.console.ask(title, message, false) == Answer::Yes
    }

    fn notify(&mut self, title: &str, message: &str) {
        self.console.show(title, message);
    }
}

/// 终端进度显示，Ctrl-C 通过共享标志请求取消
pub struct ConsoleProgress {
    cancel: Arc<AtomicBool>,
    total: usize,
    current: usize,
}

impl ConsoleProgress {
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self {
            cancel,
            total: 0,
            current: 0,
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
        println!("Exporting 2D data from {} files (Ctrl-C to cancel)", total);
    }

    fn advance(&mut self) {
        self.current += 1;
        println!("Processing file {} of {}", self.current, self.total);
    }

    fn was_cancelled_by_user(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}
