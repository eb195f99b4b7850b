use std::io;

/// Minimal sink for emitted text.
pub trait TextWriter {
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Writes `text` followed by the configured line terminator.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: TextWriter + ?Sized> TextWriter for &mut W {
    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        (**self).write_line(text)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Collects output in memory.
#[derive(Debug, Default)]
pub struct StringWriter {
    out: String,
    new_line: String,
}

impl StringWriter {
    pub fn new(new_line: impl Into<String>) -> Self {
        Self { out: String::new(), new_line: new_line.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl TextWriter for StringWriter {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.push_str(text);
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.out.push_str(text);
        self.out.push_str(&self.new_line);
        Ok(())
    }
}

/// Forwards output to any [`io::Write`], flushing on close.
#[derive(Debug)]
pub struct IoWriter<W> {
    inner: W,
    new_line: String,
}

impl<W: io::Write> IoWriter<W> {
    pub fn new(inner: W, new_line: impl Into<String>) -> Self {
        Self { inner, new_line: new_line.into() }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> TextWriter for IoWriter<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())?;
        self.inner.write_all(self.new_line.as_bytes())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writers_agree() {
        let mut string = StringWriter::new("\n");
        let mut bytes = IoWriter::new(Vec::new(), "\n");
        for writer in [&mut string as &mut dyn TextWriter, &mut bytes] {
            writer.write("a").unwrap();
            writer.write_line("b").unwrap();
            writer.write_line("").unwrap();
            writer.close().unwrap();
        }
        assert_eq!(string.as_str(), "ab\n\n");
        assert_eq!(bytes.into_inner(), b"ab\n\n");
    }
}
