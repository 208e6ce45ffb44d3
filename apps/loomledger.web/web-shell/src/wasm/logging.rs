use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use super::*;
use crate::console_sink::{ConsoleLevel, LineBuffer};

pub(super) fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|error| {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "invalid log filter '{filter}': {error}"
        )));
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        web_sys::console::warn_1(&JsValue::from_str("tracing subscriber already installed"));
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::Log)
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleLevel::for_level(*meta.level()))
    }
}

struct ConsoleWriter {
    level: ConsoleLevel,
    buffer: LineBuffer,
}

impl ConsoleWriter {
    fn new(level: ConsoleLevel) -> Self {
        Self {
            level,
            buffer: LineBuffer::default(),
        }
    }

    fn emit(&self, lines: Vec<String>) {
        for line in lines {
            let line = JsValue::from_str(&line);
            match self.level {
                ConsoleLevel::Error => web_sys::console::error_1(&line),
                ConsoleLevel::Warn => web_sys::console::warn_1(&line),
                ConsoleLevel::Log => web_sys::console::log_1(&line),
                ConsoleLevel::Debug => web_sys::console::debug_1(&line),
            }
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buffer.push(bytes);
        let lines = self.buffer.take_complete_lines();
        self.emit(lines);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let lines = self.buffer.take_all();
        self.emit(lines);
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let lines = self.buffer.take_all();
        self.emit(lines);
    }
}
