use bytes::BufMut;

/// Native protocol helpers on top of any `BufMut` sink.
pub trait WireSink: BufMut {
    fn put_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.put_u8(byte);
                return;
            }
            self.put_u8(byte | 0x80);
        }
    }

    fn put_pascal_bytes(&mut self, bytes: &[u8]) {
        self.put_varint(bytes.len() as u64);
        self.put_slice(bytes);
    }

    fn put_pascal_string(&mut self, s: &str) {
        self.put_pascal_bytes(s.as_bytes());
    }
}

impl<T: BufMut + ?Sized> WireSink for T {}
