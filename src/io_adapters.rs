use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Read, Result as IoResult, Stdin, StdinLock, Stdout, Write};
use std::rc::Rc;

/// Printed before every read in interactive mode.
pub const PROMPT: &str = "wish> ";

/// Source of command lines for the interpreter loop.
pub trait LineSource {
    /// Read the next line without its trailing newline.
    ///
    /// Returns `Ok(None)` at end of input. Lines are raw bytes; nothing is
    /// decoded.
    fn read_line(&mut self) -> IoResult<Option<Vec<u8>>>;
}

fn read_raw_line<R: BufRead>(reader: &mut R) -> IoResult<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(Some(buf))
}

/// Batch mode: lines come from a file, no prompt.
pub struct BatchReader<R> {
    reader: R,
}

impl<R: BufRead> BatchReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> BatchReader<BufReader<R>> {
    /// Wrap an unbuffered reader such as a `File`.
    pub fn buffered(inner: R) -> Self {
        Self::new(BufReader::new(inner))
    }
}

impl<R: BufRead> LineSource for BatchReader<R> {
    fn read_line(&mut self) -> IoResult<Option<Vec<u8>>> {
        read_raw_line(&mut self.reader)
    }
}

/// Interactive mode: print the prompt, flush, then read one line.
pub struct PromptedReader<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PromptedReader<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl PromptedReader<StdinLock<'static>, Stdout> {
    /// Prompt on the process stdout and read from the process stdin.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineSource for PromptedReader<R, W> {
    fn read_line(&mut self) -> IoResult<Option<Vec<u8>>> {
        self.prompt_out.write_all(PROMPT.as_bytes())?;
        self.prompt_out.flush()?;
        read_raw_line(&mut self.reader)
    }
}

/// Memory-backed writer, used to capture the error channel.
#[derive(Default)]
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    /// Public constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = mw.buf.clone();
        (mw, rc)
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
