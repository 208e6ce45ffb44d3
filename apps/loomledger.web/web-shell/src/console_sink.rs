use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConsoleLevel {
    Debug,
    Log,
    Warn,
    Error,
}

impl ConsoleLevel {
    pub(crate) fn for_level(level: Level) -> Self {
        if level == Level::ERROR {
            Self::Error
        } else if level == Level::WARN {
            Self::Warn
        } else if level == Level::INFO {
            Self::Log
        } else {
            Self::Debug
        }
    }
}

/// Collects formatter output and hands it back as whole lines. The formatter
/// may write one event in several chunks.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    pub(crate) fn take_complete_lines(&mut self) -> Vec<String> {
        let Some(last_newline) = self.pending.iter().rposition(|byte| *byte == b'\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        split_lines(&complete)
    }

    pub(crate) fn take_all(&mut self) -> Vec<String> {
        let all = std::mem::take(&mut self.pending);
        split_lines(&all)
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warn_and_error_route_to_their_console_methods() {
        assert_eq!(ConsoleLevel::for_level(Level::ERROR), ConsoleLevel::Error);
        assert_eq!(ConsoleLevel::for_level(Level::WARN), ConsoleLevel::Warn);
        assert_eq!(ConsoleLevel::for_level(Level::INFO), ConsoleLevel::Log);
        assert_eq!(ConsoleLevel::for_level(Level::TRACE), ConsoleLevel::Debug);
    }

    #[test]
    fn partial_writes_are_held_until_newline() {
        let mut buffer = LineBuffer::default();
        buffer.push(b" WARN search failed");
        assert!(buffer.take_complete_lines().is_empty());

        buffer.push(b": network\n DEBUG next");
        assert_eq!(
            buffer.take_complete_lines(),
            vec![" WARN search failed: network".to_string()]
        );
        assert_eq!(buffer.take_all(), vec![" DEBUG next".to_string()]);
        assert!(buffer.take_all().is_empty());
    }
}
