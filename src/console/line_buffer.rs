//! Line buffer for console input

/// Maximum line length; further characters are dropped.
pub const LINE_SIZE: usize = 64;

/// Line input buffer
pub struct LineBuffer {
    buf: [u8; LINE_SIZE],
    len: usize,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_SIZE],
            len: 0,
        }
    }

    /// Push a character. Returns `false` if the buffer is full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < LINE_SIZE {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Remove last character
    pub fn backspace(&mut self) -> bool {
        if self.len > 0 {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == LINE_SIZE
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
