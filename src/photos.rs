//! Fixed photo slots for a listing
//!
//! A listing carries up to eight photos in fixed positions. Slots never shift:
//! clearing slot 3 leaves slot 4 where it was.

use std::path::Path;

use thiserror::Error;

/// Number of photo slots on a listing
pub const SLOT_COUNT: usize = 8;

/// Default per-photo size limit (5 MiB)
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Photo validation errors, phrased for the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    #[error("Slot {} does not exist, choose a slot between 1 and {}", .index + 1, SLOT_COUNT)]
    InvalidSlot { index: usize },

    #[error("\"{name}\" is not an image ({media_type})")]
    NotAnImage { name: String, media_type: String },

    #[error("\"{name}\" is {} but photos are limited to {}", size_label(.size), size_label(.limit))]
    TooLarge { name: String, size: u64, limit: u64 },
}

/// An in-memory photo selected by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    /// Build a photo, detecting its media type from content then extension
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let media_type = detect_media_type(&name, &bytes).to_string();
        Self {
            name,
            media_type,
            bytes,
        }
    }

    /// Read a photo from disk without blocking the event loop
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Detect a media type from the file signature, falling back to the extension
pub fn detect_media_type(name: &str, bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return "image/png";
    }
    if bytes.starts_with(b"\xff\xd8\xff") {
        return "image/jpeg";
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    if bytes.starts_with(b"BM") {
        return "image/bmp";
    }

    let extension = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => FALLBACK_MEDIA_TYPE,
    }
}

/// Human-readable byte size (B, KiB, MiB)
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn size_label(bytes: &u64) -> String {
    format_size(*bytes)
}

/// Display summary of a filled slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPreview {
    pub name: String,
    pub media_type: String,
    pub size_label: String,
}

impl From<&PhotoFile> for PhotoPreview {
    fn from(file: &PhotoFile) -> Self {
        Self {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            size_label: format_size(file.size()),
        }
    }
}

/// Exactly `SLOT_COUNT` photo positions, each empty or holding one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSlots {
    slots: [Option<PhotoFile>; SLOT_COUNT],
    max_bytes: u64,
}

impl Default for PhotoSlots {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_PHOTO_BYTES)
    }
}

impl PhotoSlots {
    pub fn with_limit(max_bytes: u64) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            max_bytes,
        }
    }

    /// Always `SLOT_COUNT`
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn get(&self, index: usize) -> Option<&PhotoFile> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Place `file` in slot `index`, replacing any previous photo there.
    ///
    /// Rejected files leave the slot untouched.
    pub fn assign(&mut self, index: usize, file: PhotoFile) -> Result<(), PhotoError> {
        if index >= SLOT_COUNT {
            return Err(PhotoError::InvalidSlot { index });
        }
        if !file.is_image() {
            return Err(PhotoError::NotAnImage {
                name: file.name,
                media_type: file.media_type,
            });
        }
        if file.size() > self.max_bytes {
            return Err(PhotoError::TooLarge {
                size: file.size(),
                name: file.name,
                limit: self.max_bytes,
            });
        }

        self.slots[index] = Some(file);
        Ok(())
    }

    /// Empty slot `index`, returning the discarded file
    pub fn clear(&mut self, index: usize) -> Result<Option<PhotoFile>, PhotoError> {
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot.take()),
            None => Err(PhotoError::InvalidSlot { index }),
        }
    }

    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    pub fn preview(&self, index: usize) -> Option<PhotoPreview> {
        self.get(index).map(PhotoPreview::from)
    }

    pub fn previews(&self) -> [Option<PhotoPreview>; SLOT_COUNT] {
        std::array::from_fn(|i| self.preview(i))
    }

    /// Presence marker per slot
    pub fn markers(&self) -> [bool; SLOT_COUNT] {
        std::array::from_fn(|i| self.slots[i].is_some())
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Filled slots in slot order, gaps skipped
    pub fn files(&self) -> impl Iterator<Item = &PhotoFile> {
        self.slots.iter().flatten()
    }

    /// First empty slot, if any
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> PhotoFile {
        PhotoFile::new(name, b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec())
    }

    #[test]
    fn test_detects_media_type_from_signature() {
        assert_eq!(detect_media_type("x", b"\x89PNG\r\n\x1a\n..."), "image/png");
        assert_eq!(detect_media_type("x", b"\xff\xd8\xff\xe0"), "image/jpeg");
        assert_eq!(detect_media_type("x", b"GIF89a.."), "image/gif");
        assert_eq!(detect_media_type("x", b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
    }

    #[test]
    fn test_detects_media_type_from_extension() {
        assert_eq!(detect_media_type("foto.JPG", b""), "image/jpeg");
        assert_eq!(detect_media_type("doc.pdf", b"%PDF"), "application/pdf");
        assert_eq!(detect_media_type("noext", b"abc"), FALLBACK_MEDIA_TYPE);
    }

    #[test]
    fn test_new_slots_are_empty() {
        let slots = PhotoSlots::default();
        assert_eq!(slots.len(), SLOT_COUNT);
        assert!(slots.is_empty());
        assert_eq!(slots.markers(), [false; SLOT_COUNT]);
    }

    #[test]
    fn test_assign_keeps_file_at_index() {
        let mut slots = PhotoSlots::default();
        slots.assign(3, png("sala.png")).unwrap();

        assert_eq!(slots.get(3).map(|f| f.name.as_str()), Some("sala.png"));
        assert!(slots.get(4).is_none());
        assert_eq!(slots.filled_count(), 1);
    }

    #[test]
    fn test_assign_rejects_non_image_and_leaves_slot() {
        let mut slots = PhotoSlots::default();
        slots.assign(0, png("antes.png")).unwrap();

        let err = slots
            .assign(0, PhotoFile::new("orcamento.pdf", b"%PDF-1.4".to_vec()))
            .unwrap_err();
        assert_eq!(
            err,
            PhotoError::NotAnImage {
                name: "orcamento.pdf".to_string(),
                media_type: "application/pdf".to_string(),
            }
        );
        assert_eq!(slots.get(0).map(|f| f.name.as_str()), Some("antes.png"));
    }

    #[test]
    fn test_assign_enforces_size_limit() {
        let mut slots = PhotoSlots::default();
        let mut bytes = b"\xff\xd8\xff".to_vec();
        bytes.resize(DEFAULT_MAX_PHOTO_BYTES as usize + 1, 0);

        let err = slots.assign(2, PhotoFile::new("big.jpg", bytes)).unwrap_err();
        assert!(matches!(err, PhotoError::TooLarge { limit, .. } if limit == DEFAULT_MAX_PHOTO_BYTES));
        assert!(slots.get(2).is_none());
    }

    #[test]
    fn test_assign_accepts_exact_limit() {
        let mut slots = PhotoSlots::default();
        let mut bytes = b"\xff\xd8\xff".to_vec();
        bytes.resize(DEFAULT_MAX_PHOTO_BYTES as usize, 0);

        slots.assign(7, PhotoFile::new("ok.jpg", bytes)).unwrap();
        assert!(slots.get(7).is_some());
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut slots = PhotoSlots::default();
        assert_eq!(
            slots.assign(SLOT_COUNT, png("x.png")),
            Err(PhotoError::InvalidSlot { index: SLOT_COUNT })
        );
        assert_eq!(
            slots.clear(99),
            Err(PhotoError::InvalidSlot { index: 99 })
        );
    }

    #[test]
    fn test_clear_never_shifts_other_slots() {
        let mut slots = PhotoSlots::default();
        slots.assign(2, png("a.png")).unwrap();
        slots.assign(3, png("b.png")).unwrap();
        slots.assign(4, png("c.png")).unwrap();

        let removed = slots.clear(3).unwrap();
        assert_eq!(removed.map(|f| f.name), Some("b.png".to_string()));
        assert_eq!(slots.get(2).map(|f| f.name.as_str()), Some("a.png"));
        assert!(slots.get(3).is_none());
        assert_eq!(slots.get(4).map(|f| f.name.as_str()), Some("c.png"));
        assert_eq!(slots.len(), SLOT_COUNT);
    }

    #[test]
    fn test_slot_count_stable_under_mixed_operations() {
        let mut slots = PhotoSlots::default();
        for round in 0..5 {
            for i in 0..SLOT_COUNT {
                if (i + round) % 2 == 0 {
                    slots.assign(i, png(&format!("{}-{}.png", round, i))).unwrap();
                } else {
                    slots.clear(i).unwrap();
                }
                let _ = slots.assign(i, PhotoFile::new("x.txt", b"hi".to_vec()));
                assert_eq!(slots.len(), SLOT_COUNT);
                assert_eq!(slots.markers().len(), SLOT_COUNT);
            }
        }
    }

    #[test]
    fn test_files_are_in_slot_order_without_gaps() {
        let mut slots = PhotoSlots::default();
        slots.assign(5, png("late.png")).unwrap();
        slots.assign(1, png("early.png")).unwrap();

        let names: Vec<&str> = slots.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["early.png", "late.png"]);
        assert_eq!(slots.first_empty(), Some(0));
    }

    #[test]
    fn test_preview_describes_file() {
        let mut slots = PhotoSlots::default();
        slots.assign(0, png("fachada.png")).unwrap();

        let preview = slots.preview(0).unwrap();
        assert_eq!(preview.name, "fachada.png");
        assert_eq!(preview.media_type, "image/png");
        assert_eq!(preview.size_label, "16 B");
        assert!(slots.preview(1).is_none());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_error_messages_use_one_based_slots() {
        assert_eq!(
            PhotoError::InvalidSlot { index: 8 }.to_string(),
            "Slot 9 does not exist, choose a slot between 1 and 8"
        );
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("quarto.gif");
        std::fs::write(&path, b"GIF89a\x01\x00").unwrap();

        let file = PhotoFile::read(&path).await.unwrap();
        assert_eq!(file.name, "quarto.gif");
        assert_eq!(file.media_type, "image/gif");
        assert_eq!(file.size(), 8);
    }
}
