//! Head-first document sink.

use std::fmt::Display;

use futures::{Sink, SinkExt};

use crate::document::AssembledDocument;

/// Errors raised while writing a document.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("{0} sent out of order")]
    OutOfOrder(&'static str),

    #[error("transport error: {0}")]
    Transport(String),
}

/// State of the document sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkState {
    /// Nothing sent yet.
    Initial,
    /// Doctype, head and styles sent.
    OpeningSent,
    /// Page markup sent.
    BodySent,
    /// Scripts and document end sent.
    Completed,
}

/// Writes an assembled document over any byte sink.
///
/// The opening (head and every style tag) must go first, then the body,
/// then the closing part with the scripts. Styles therefore always reach
/// the browser before any script that could hydrate the page.
pub struct DocumentSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    inner: S,
    state: SinkState,
    bytes_sent: usize,
}

impl<S, E> DocumentSink<S, E>
where
    S: Sink<Vec<u8>, Error = E> + Unpin,
    E: Display,
{
    /// Create a new document sink.
    pub fn new(sink: S) -> Self {
        Self {
            inner: sink,
            state: SinkState::Initial,
            bytes_sent: 0,
        }
    }

    /// Send doctype, head and styles.
    pub async fn send_opening(&mut self, document: &AssembledDocument) -> Result<(), SinkError> {
        if self.state != SinkState::Initial {
            return Err(SinkError::OutOfOrder("opening"));
        }

        self.write(document.render_opening().into_bytes()).await?;
        self.state = SinkState::OpeningSent;
        Ok(())
    }

    /// Send the page markup. The opening must have been sent.
    pub async fn send_body(&mut self, document: &AssembledDocument) -> Result<(), SinkError> {
        if self.state != SinkState::OpeningSent {
            return Err(SinkError::OutOfOrder("body"));
        }

        self.write(document.render_body().as_bytes().to_vec()).await?;
        self.state = SinkState::BodySent;
        Ok(())
    }

    /// Send scripts and the document end, then flush.
    pub async fn send_closing(&mut self, document: &AssembledDocument) -> Result<(), SinkError> {
        if self.state != SinkState::BodySent {
            return Err(SinkError::OutOfOrder("closing"));
        }

        self.write(document.render_closing().into_bytes()).await?;
        self.inner
            .flush()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        self.state = SinkState::Completed;
        Ok(())
    }

    /// Send the whole document in order.
    pub async fn send_document(&mut self, document: &AssembledDocument) -> Result<(), SinkError> {
        self.send_opening(document).await?;
        self.send_body(document).await?;
        self.send_closing(document).await
    }

    async fn write(&mut self, bytes: Vec<u8>) -> Result<(), SinkError> {
        let len = bytes.len();
        self.inner
            .send(bytes)
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        self.bytes_sent += len;
        Ok(())
    }

    /// Current state.
    pub fn state(&self) -> SinkState {
        self.state
    }

    /// Total bytes written.
    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent
    }

    /// Consume the sink and return the inner value.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ScriptTag, StyleTag};
    use crate::head::HeadContent;
    use futures::channel::mpsc;
    use futures::executor::block_on;
    use futures::StreamExt;

    fn document() -> AssembledDocument {
        AssembledDocument {
            lang: "en".to_string(),
            dir: "ltr".to_string(),
            head: HeadContent::new().with_title("t"),
            styles: vec![StyleTag::inline(".a{}")],
            mount_id: "app".to_string(),
            body: "<p>body</p>".to_string(),
            scripts: vec![ScriptTag::External {
                src: "/main.js".to_string(),
            }],
        }
    }

    #[test]
    fn test_send_document_in_order() {
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        let doc = document();

        let mut sink = DocumentSink::new(tx);
        block_on(sink.send_document(&doc)).unwrap();
        assert_eq!(sink.state(), SinkState::Completed);
        assert_eq!(sink.bytes_sent(), doc.to_html().len());
        drop(sink);

        let chunks: Vec<String> = block_on(rx.collect::<Vec<_>>())
            .into_iter()
            .map(|chunk| String::from_utf8(chunk).unwrap())
            .collect();

        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].contains("<style>.a{}</style>"));
        assert_eq!(chunks[1], "<p>body</p>");
        assert!(chunks[2].contains(r#"<script src="/main.js" defer></script>"#));
        assert_eq!(chunks.concat(), doc.to_html());
    }

    #[test]
    fn test_body_before_opening_is_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = DocumentSink::new(tx);

        let result = block_on(sink.send_body(&document()));

        assert!(matches!(result, Err(SinkError::OutOfOrder("body"))));
        assert_eq!(sink.state(), SinkState::Initial);
        assert_eq!(sink.bytes_sent(), 0);
    }

    #[test]
    fn test_closing_before_body_is_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = DocumentSink::new(tx);
        let doc = document();

        block_on(sink.send_opening(&doc)).unwrap();
        let result = block_on(sink.send_closing(&doc));

        assert!(matches!(result, Err(SinkError::OutOfOrder("closing"))));
        assert_eq!(sink.state(), SinkState::OpeningSent);
    }

    #[test]
    fn test_opening_twice_is_rejected() {
        let (tx, _rx) = mpsc::unbounded::<Vec<u8>>();
        let mut sink = DocumentSink::new(tx);
        let doc = document();

        block_on(sink.send_opening(&doc)).unwrap();
        assert!(block_on(sink.send_opening(&doc)).is_err());
    }

    #[test]
    fn test_transport_error() {
        let (tx, rx) = mpsc::unbounded::<Vec<u8>>();
        drop(rx);
        let mut sink = DocumentSink::new(tx);

        let result = block_on(sink.send_opening(&document()));

        assert!(matches!(result, Err(SinkError::Transport(_))));
        assert_eq!(sink.state(), SinkState::Initial);
    }
}
