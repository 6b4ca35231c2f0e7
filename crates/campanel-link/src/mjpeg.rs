//! Extracts JPEG frames from a multipart MJPEG byte stream.
//!
//! Part boundaries and headers are ignored; frames are delimited by the JPEG
//! start-of-image and end-of-image markers. A frame ends at the first
//! end-of-image marker after its start, so a JPEG carrying an embedded EXIF
//! thumbnail would be cut at the end of the thumbnail. The camera firmware
//! streams plain baseline frames without thumbnails.

use tracing::warn;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Incremental frame extractor.
#[derive(Debug, Clone)]
pub struct MjpegScanner {
    buffer: Vec<u8>,
    max_frame_bytes: usize,
}

impl MjpegScanner {
    /// Creates a scanner that drops partial frames larger than `max_frame_bytes`.
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_bytes,
        }
    }

    /// Feeds `chunk` and returns every frame it completed.
    ///
    /// Each frame runs from a start-of-image marker to the first
    /// end-of-image marker that follows it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        loop {
            let Some(start) = find_marker(&self.buffer, 0, SOI) else {
                // A trailing 0xFF may be the first half of a split marker.
                let keep = usize::from(self.buffer.last() == Some(&0xFF));
                let discard = self.buffer.len() - keep;
                self.buffer.drain(..discard);
                break;
            };

            let Some(end) = find_marker(&self.buffer, start + SOI.len(), EOI) else {
                self.buffer.drain(..start);
                if self.buffer.len() > self.max_frame_bytes {
                    warn!(
                        buffered = self.buffer.len(),
                        limit = self.max_frame_bytes,
                        "dropping oversized partial frame"
                    );
                    self.buffer.clear();
                }
                break;
            };

            let frame_end = end + EOI.len();
            frames.push(self.buffer[start..frame_end].to_vec());
            self.buffer.drain(..frame_end);
        }

        frames
    }

    /// Returns the number of buffered bytes not yet emitted.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn find_marker(buffer: &[u8], from: usize, marker: [u8; 2]) -> Option<usize> {
    buffer
        .get(from..)?
        .windows(2)
        .position(|window| window == marker)
        .map(|position| position + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(payload: &[u8]) -> Vec<u8> {
        let mut frame = SOI.to_vec();
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&EOI);
        frame
    }

    #[test]
    fn extracts_frames_between_multipart_headers() {
        let mut scanner = MjpegScanner::new(1024);
        let mut body = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        body.extend(jpeg(&[1, 2, 3]));
        body.extend_from_slice(b"\r\n--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        body.extend(jpeg(&[4, 5]));

        let frames = scanner.push(&body);
        assert_eq!(frames, vec![jpeg(&[1, 2, 3]), jpeg(&[4, 5])]);
        assert_eq!(scanner.pending(), 0);
    }

    #[test]
    fn reassembles_frames_split_across_chunks() {
        let mut scanner = MjpegScanner::new(1024);
        let frame = jpeg(&[9, 9, 9, 9]);

        assert!(scanner.push(&frame[..1]).is_empty());
        assert!(scanner.push(&frame[1..4]).is_empty());
        assert!(scanner.push(&frame[4..frame.len() - 1]).is_empty());
        assert_eq!(scanner.push(&frame[frame.len() - 1..]), vec![frame]);
    }

    #[test]
    fn drops_partial_frames_over_the_limit() {
        let mut scanner = MjpegScanner::new(8);
        let mut partial = SOI.to_vec();
        partial.extend_from_slice(&[0; 16]);

        assert!(scanner.push(&partial).is_empty());
        assert_eq!(scanner.pending(), 0);
    }

    #[test]
    fn frame_ends_at_the_first_end_of_image_marker() {
        let mut scanner = MjpegScanner::new(1024);
        let mut body = jpeg(&[1]);
        body.extend_from_slice(&[2, 3]);
        body.extend_from_slice(&EOI);

        assert_eq!(scanner.push(&body), vec![jpeg(&[1])]);
        assert_eq!(scanner.pending(), 0);
    }
}
