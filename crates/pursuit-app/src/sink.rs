//! Frame sinks: where rendered frames go once a tick completes.

use std::io::{self, Write};

use pursuit_core::state::RenderFrame;

/// Consumer of render frames. Must not feed anything back into the simulation.
pub trait FrameSink {
    fn present(&mut self, frame: &RenderFrame) -> io::Result<()>;
}

/// Writes each frame as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &RenderFrame) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &RenderFrame) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pursuit_core::types::SimTime;

    #[test]
    fn test_json_lines_one_frame_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        for tick in 1..=3 {
            let frame = RenderFrame {
                time: SimTime { tick },
                ..Default::default()
            };
            sink.present(&frame).unwrap();
        }

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: RenderFrame = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last.time.tick, 3);
    }
}
