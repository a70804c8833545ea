use std::{io, str};

/// Trait used by the [`Port`](super::Port) for pulling characters out of an
/// input source.
///
/// Implementations deliver characters one at a time and return `Ok(None)` at
/// the end of the stream. A source may return more characters after having
/// reported the end of the stream once, as a terminal does after the user
/// presses Ctrl-D.
pub trait Read {
    /// Returns the next character, or `None` at the end of the stream.
    fn next(&mut self) -> io::Result<Option<char>>;
}

impl<'a, R: Read + ?Sized> Read for &'a mut R {
    fn next(&mut self) -> io::Result<Option<char>> {
        (**self).next()
    }
}

/// Input source that reads from a UTF-8 string.
pub struct StrRead<'a> {
    chars: str::Chars<'a>,
}

impl<'a> StrRead<'a> {
    /// Create an input source to read from a string.
    pub fn new(s: &'a str) -> Self {
        StrRead { chars: s.chars() }
    }
}

impl<'a> Read for StrRead<'a> {
    #[inline]
    fn next(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Input source that reads UTF-8 text from a `std::io` input stream.
///
/// Bytes are pulled one at a time, so wrap unbuffered sources such as files
/// in a [`std::io::BufReader`].
pub struct IoRead<R>
where
    R: io::Read,
{
    bytes: io::Bytes<R>,
}

impl<R> IoRead<R>
where
    R: io::Read,
{
    /// Create an input source to read from a std::io input stream.
    pub fn new(reader: R) -> Self {
        IoRead {
            bytes: reader.bytes(),
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.bytes.next().transpose()
    }
}

impl<R> Read for IoRead<R>
where
    R: io::Read,
{
    fn next(&mut self) -> io::Result<Option<char>> {
        let first = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = utf8_width(first);
        if width == 1 {
            return Ok(Some(char::from(first)));
        }
        if width == 0 {
            return Err(invalid_utf8());
        }
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.next_byte()?.ok_or_else(invalid_utf8)?;
        }
        str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid_utf8)
    }
}

fn utf8_width(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}
