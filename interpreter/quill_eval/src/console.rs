//! Console abstraction for `print` and `read`.
//!
//! Output goes to stdout in normal runs and to an in-memory buffer in
//! tests; the buffer variant also serves scripted input lines so `read`
//! stays testable. Enum dispatch keeps the hot print path static.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub enum Console {
    Stdout,
    Buffer(RefCell<ConsoleBuffer>),
}

#[derive(Default)]
pub struct ConsoleBuffer {
    output: String,
    input: VecDeque<String>,
}

impl Console {
    pub fn stdout() -> Self {
        Console::Stdout
    }

    /// Capturing console with no scripted input.
    pub fn buffer() -> Self {
        Console::Buffer(RefCell::new(ConsoleBuffer::default()))
    }

    /// Capturing console that serves the given lines to `read`.
    pub fn buffer_with_input(lines: impl IntoIterator<Item = String>) -> Self {
        Console::Buffer(RefCell::new(ConsoleBuffer {
            output: String::new(),
            input: lines.into_iter().collect(),
        }))
    }

    pub fn print(&self, text: &str) {
        match self {
            Console::Stdout => {
                print!("{text}");
                let _ = io::stdout().flush();
            }
            Console::Buffer(buf) => buf.borrow_mut().output.push_str(text),
        }
    }

    pub fn println(&self, text: &str) {
        match self {
            Console::Stdout => println!("{text}"),
            Console::Buffer(buf) => {
                let mut buf = buf.borrow_mut();
                buf.output.push_str(text);
                buf.output.push('\n');
            }
        }
    }

    /// One line of input, without the trailing newline. `None` on end
    /// of input.
    pub fn read_line(&self) -> Option<String> {
        match self {
            Console::Stdout => {
                let mut line = String::new();
                match io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => {
                        while line.ends_with('\n') || line.ends_with('\r') {
                            line.pop();
                        }
                        Some(line)
                    }
                }
            }
            Console::Buffer(buf) => buf.borrow_mut().input.pop_front(),
        }
    }

    /// Captured output; empty for the stdout variant.
    pub fn output(&self) -> String {
        match self {
            Console::Stdout => String::new(),
            Console::Buffer(buf) => buf.borrow().output.clone(),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Console::Stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn buffer_captures_prints() {
        let console = Console::buffer();
        console.print("a ");
        console.println("b");
        assert_eq!(console.output(), "a b\n");
    }

    #[test]
    fn buffer_serves_scripted_input() {
        let console = Console::buffer_with_input(vec!["hello".to_string()]);
        assert_eq!(console.read_line(), Some("hello".to_string()));
        assert_eq!(console.read_line(), None);
    }
}
