//! Message formatting utilities for client display.

use chatterm_shared::time::format_clock_time;

use crate::domain::ChatMessage;

const TAB_WIDTH: usize = 4;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Neutralize text that would otherwise be interpreted by the terminal
    ///
    /// Server frames are displayed verbatim, so escape sequences must not
    /// reach stdout. C0 controls and DEL are shown in caret notation
    /// (`ESC` becomes `^[`), C1 controls become U+FFFD. Line endings are
    /// normalized to `\n` and tabs expand to spaces.
    pub fn sanitize(text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\n' => output.push('\n'),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        continue;
                    }
                    output.push('\n');
                }
                '\t' => output.push_str(&" ".repeat(TAB_WIDTH)),
                '\u{7f}' => output.push_str("^?"),
                c if (c as u32) < 0x20 => {
                    output.push('^');
                    output.push(char::from(c as u8 + 0x40));
                }
                '\u{80}'..='\u{9f}' => output.push('\u{FFFD}'),
                c => output.push(c),
            }
        }

        output
    }

    /// Split a message body into display lines
    ///
    /// # Returns
    ///
    /// The sanitized lines; an empty body yields a single empty line
    pub fn body_lines(text: &str) -> Vec<String> {
        Self::sanitize(text)
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// Number of terminal lines a message occupies
    pub fn line_count(message: &ChatMessage) -> usize {
        Self::body_lines(&message.text).len()
    }

    /// Format a message with its local wall-clock time
    pub fn format_message(message: &ChatMessage) -> String {
        Self::format_message_at(message, &format_clock_time(message.sent_at))
    }

    /// Format a message with an already rendered clock time
    ///
    /// # Arguments
    ///
    /// * `message` - The message to render
    /// * `clock_time` - Display time, e.g. `12:34:56`
    ///
    /// # Returns
    ///
    /// `[clock_time] Sender: line` followed by continuation lines indented
    /// under the first line's text, newline terminated
    pub fn format_message_at(message: &ChatMessage, clock_time: &str) -> String {
        let prefix = format!("[{}] {}: ", clock_time, message.sender);
        let indent = " ".repeat(prefix.chars().count());

        let mut output = String::new();
        for (i, line) in Self::body_lines(&message.text).iter().enumerate() {
            if i == 0 {
                output.push_str(&prefix);
            } else {
                output.push_str(&indent);
            }
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}
