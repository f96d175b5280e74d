//! Header block reader shared by commits and tags.
//!
//! A header block is a run of `key value\n` lines ended by an empty line.
//! Lines starting with a space continue the previous value; they are folded
//! in with a `\n` and the leading space removed. Everything after the empty
//! line is the message.

use std::borrow::Cow;

use bstr::ByteSlice;

/// Iterator over the headers of a commit or tag payload.
pub(crate) struct Headers<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Headers<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }

    /// The message: everything after the blank separator line.
    ///
    /// Only meaningful once the iterator is exhausted.
    pub(crate) fn message(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }
}

impl<'a> Iterator for Headers<'a> {
    type Item = (&'a [u8], Cow<'a, [u8]>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let data = self.data;
        if self.pos >= data.len() {
            self.done = true;
            return None;
        }
        if data[self.pos] == b'\n' {
            self.pos += 1;
            self.done = true;
            return None;
        }

        let line_end = find_line_end(data, self.pos);
        let line = &data[self.pos..line_end];
        let (key, first) = match line.find_byte(b' ') {
            Some(space) => (&line[..space], &line[space + 1..]),
            None => (line, &line[line.len()..]),
        };

        let mut value = Cow::Borrowed(first);
        let mut next = line_end + 1;
        while next < data.len() && data[next] == b' ' {
            let cont_end = find_line_end(data, next);
            let folded = value.to_mut();
            folded.push(b'\n');
            folded.extend_from_slice(&data[next + 1..cont_end]);
            next = cont_end + 1;
        }
        self.pos = next.min(data.len());
        Some((key, value))
    }
}

fn find_line_end(data: &[u8], from: usize) -> usize {
    data[from..]
        .find_byte(b'\n')
        .map(|p| p + from)
        .unwrap_or(data.len())
}

/// Write one header, re-indenting multi-line values as continuation lines.
pub(crate) fn write_header(out: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    out.extend_from_slice(key);
    out.push(b' ');
    for (i, line) in value.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.extend_from_slice(b"\n ");
        }
        out.extend_from_slice(line);
    }
    out.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u8]) -> (Vec<(Vec<u8>, Vec<u8>)>, Vec<u8>) {
        let mut headers = Headers::new(data);
        let fields = headers
            .by_ref()
            .map(|(k, v)| (k.to_vec(), v.into_owned()))
            .collect();
        (fields, headers.message().to_vec())
    }

    #[test]
    fn simple_headers_and_message() {
        let (fields, message) = collect(b"tree abc\nparent def\n\nhello\n");
        assert_eq!(
            fields,
            vec![
                (b"tree".to_vec(), b"abc".to_vec()),
                (b"parent".to_vec(), b"def".to_vec())
            ]
        );
        assert_eq!(message, b"hello\n");
    }

    #[test]
    fn continuation_lines_fold() {
        let (fields, message) = collect(b"gpgsig -----BEGIN-----\n line two\n -----END-----\n\nmsg");
        assert_eq!(fields[0].1, b"-----BEGIN-----\nline two\n-----END-----".to_vec());
        assert_eq!(message, b"msg");
    }

    #[test]
    fn no_blank_line_means_empty_message() {
        let (fields, message) = collect(b"tag v1");
        assert_eq!(fields, vec![(b"tag".to_vec(), b"v1".to_vec())]);
        assert!(message.is_empty());
    }

    #[test]
    fn message_keeps_blank_lines_verbatim() {
        let (_, message) = collect(b"k v\n\n\nbody\n\n");
        assert_eq!(message, b"\nbody\n\n");
    }

    #[test]
    fn write_header_reindents() {
        let mut out = Vec::new();
        write_header(&mut out, b"mergetag", b"object x\ntype commit");
        assert_eq!(out, b"mergetag object x\n type commit\n");
    }
}
