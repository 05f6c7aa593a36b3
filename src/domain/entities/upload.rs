/// File received from a client, not yet stored.
#[derive(Clone)]
pub struct FileUpload {
    pub content: Vec<u8>,
    pub filename: String,
    /// Subdirectory below the media root, e.g. `workouts/images`.
    pub directory: String,
}

impl FileUpload {
    pub fn new(content: Vec<u8>, filename: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            content,
            filename: filename.into(),
            directory: directory.into(),
        }
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("filename", &self.filename)
            .field("directory", &self.directory)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Location of a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: String,
}
