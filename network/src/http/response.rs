//! Request-to-response hook.

/// Turns a received request into response bytes.
pub trait Responder {
    /// Write the response for `request` into `response`.
    ///
    /// Returns the number of bytes written, at most `response.len()`.
    /// Returning zero closes the connection without sending anything.
    fn respond(&mut self, request: &[u8], response: &mut [u8]) -> usize;
}

impl<F> Responder for F
where
    F: FnMut(&[u8], &mut [u8]) -> usize,
{
    fn respond(&mut self, request: &[u8], response: &mut [u8]) -> usize {
        self(request, response)
    }
}

/// Minimal HTML page with HTTP/1.0 headers.
pub const HELLO_PAGE: &[u8] = b"HTTP/1.0 200 OK\r\n\
Content-Type: text/html\r\n\
Pragma: no-cache\r\n\
\r\n\
<html>\r\n\
<body>\r\n\
<title>W5100</title>\r\n\
<p>Hello world</p>\r\n\
</body>\r\n\
</html>\r\n";

/// Answers every request with a fixed byte string.
///
/// Output longer than the response buffer is cut off at the buffer end.
#[derive(Debug, Clone, Copy)]
pub struct StaticPage {
    body: &'static [u8],
}

impl StaticPage {
    pub const fn new(body: &'static [u8]) -> Self {
        Self { body }
    }

    pub const fn body(&self) -> &'static [u8] {
        self.body
    }
}

impl Default for StaticPage {
    fn default() -> Self {
        Self::new(HELLO_PAGE)
    }
}

impl Responder for StaticPage {
    fn respond(&mut self, _request: &[u8], response: &mut [u8]) -> usize {
        let len = self.body.len().min(response.len());
        response[..len].copy_from_slice(&self.body[..len]);
        len
    }
}
