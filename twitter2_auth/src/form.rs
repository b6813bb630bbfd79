use std::borrow::Cow;

use libshire::encoding::url::{percent_decode_utf8, percent_encode, FormDecode};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encodes the given key-value pairs as an `application/x-www-form-urlencoded` string.
pub(crate) fn encode_form<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut buf = String::new();
    for (key, val) in params {
        if !buf.is_empty() {
            buf.push('&');
        }
        buf.push_str(&percent_encode(key));
        buf.push('=');
        buf.push_str(&percent_encode(val));
    }
    buf
}

/// Iterates over the decoded key-value pairs of an `application/x-www-form-urlencoded` string,
/// such as a URL query string or a form request body.
pub(crate) struct FormDecoder<'a> {
    bytes: &'a [u8],
}

impl<'a> FormDecoder<'a> {
    pub(crate) fn new<T>(bytes: &'a T) -> Self
    where
        T: AsRef<[u8]> + ?Sized,
    {
        Self {
            bytes: bytes.as_ref(),
        }
    }
}

impl<'a> Iterator for FormDecoder<'a> {
    type Item = (Cow<'a, str>, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        // Skip over empty pairs, e.g. the one between the ampersands in `a=1&&b=2`.
        loop {
            if self.bytes.is_empty() {
                return None;
            }
            let (pair, remainder) = split_on_byte(self.bytes, b'&');
            self.bytes = remainder;
            if pair.is_empty() {
                continue;
            }
            let (key, val) = split_on_byte(pair, b'=');
            let key = percent_decode_utf8(key, FormDecode);
            let val = percent_decode_utf8(val, FormDecode);
            return Some((key, val));
        }
    }
}

fn split_on_byte(bytes: &[u8], delim: u8) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&byte| byte == delim) {
        Some(index) => (&bytes[..index], &bytes[(index + 1)..]),
        None => (bytes, &bytes[bytes.len()..]),
    }
}
