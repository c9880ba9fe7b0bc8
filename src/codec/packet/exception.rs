use bytes::BufMut;

use crate::codec::cursor::{ByteCursor, WireSink, read_whole};
use crate::codec::errors::{CodecError, ServerException};

/// Reads an exception frame and its nested causes, consuming nothing until all are buffered.
pub fn read_exception<C: ByteCursor>(cursor: &mut C) -> Result<Option<ServerException>, CodecError> {
    read_whole(cursor, |view| {
        let mut chain = Vec::new();
        loop {
            let Some(code) = view.read_i32_le() else {
                return Ok(None);
            };
            let Some(name) = view.read_pascal_string()? else {
                return Ok(None);
            };
            let Some(message) = view.read_pascal_string()? else {
                return Ok(None);
            };
            let Some(stack_trace) = view.read_pascal_string()? else {
                return Ok(None);
            };
            let Some(has_nested) = view.read_u8() else {
                return Ok(None);
            };
            chain.push(ServerException {
                code,
                name,
                message,
                stack_trace,
                nested: None,
            });
            if has_nested == 0 {
                break;
            }
        }
        let mut nested: Option<Box<ServerException>> = None;
        while let Some(mut outer) = chain.pop() {
            outer.nested = nested.take();
            nested = Some(Box::new(outer));
        }
        Ok(nested.map(|e| *e))
    })
}

pub fn write_exception<B: BufMut + ?Sized>(sink: &mut B, exception: &ServerException) {
    let mut current = Some(exception);
    while let Some(e) = current {
        sink.put_i32_le(e.code);
        sink.put_pascal_string(&e.name);
        sink.put_pascal_string(&e.message);
        sink.put_pascal_string(&e.stack_trace);
        sink.put_u8(u8::from(e.nested.is_some()));
        current = e.nested.as_deref();
    }
}
