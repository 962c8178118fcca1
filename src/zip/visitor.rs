use super::records::{CentralDirectoryHeader, DataDescriptor, EndOfCentralDirectory, FileHeader};

/// Receiver of everything the [`StreamParser`](super::StreamParser) decodes.
///
/// Methods are called synchronously from within `feed`, in stream order.
/// Every method has an empty default, so implementors only override what
/// they care about.
pub trait ZipVisitor {
    /// A local file header was decoded; content for this entry follows.
    fn local_header(&mut self, _header: &FileHeader) {}

    /// Decompressed bytes of the entry announced by `header`.
    ///
    /// Called zero or more times per entry, never with an empty slice.
    fn content(&mut self, _header: &FileHeader, _data: &[u8]) {}

    /// The data descriptor closing the entry announced by `header`.
    fn data_descriptor(&mut self, _header: &FileHeader, _descriptor: &DataDescriptor) {}

    fn central_directory_header(&mut self, _header: &CentralDirectoryHeader) {}

    /// The terminal record. Nothing else is reported afterwards.
    fn end_of_central_directory(&mut self, _eocd: &EndOfCentralDirectory) {}
}

impl<V: ZipVisitor + ?Sized> ZipVisitor for &mut V {
    fn local_header(&mut self, header: &FileHeader) {
        (**self).local_header(header)
    }

    fn content(&mut self, header: &FileHeader, data: &[u8]) {
        (**self).content(header, data)
    }

    fn data_descriptor(&mut self, header: &FileHeader, descriptor: &DataDescriptor) {
        (**self).data_descriptor(header, descriptor)
    }

    fn central_directory_header(&mut self, header: &CentralDirectoryHeader) {
        (**self).central_directory_header(header)
    }

    fn end_of_central_directory(&mut self, eocd: &EndOfCentralDirectory) {
        (**self).end_of_central_directory(eocd)
    }
}

impl ZipVisitor for () {}

type Callback<'a, T> = Box<dyn FnMut(&T) + 'a>;

/// Closure based visitor with one registration point per callback.
///
/// ```
/// use zipstream::zip::{Callbacks, StreamParser};
///
/// let mut names = Vec::new();
/// let callbacks = Callbacks::new().on_local_header(|header| names.push(header.file_name()));
/// let mut parser = StreamParser::new(callbacks);
/// parser.feed(b"").unwrap();
/// drop(parser);
/// assert!(names.is_empty());
/// ```
#[derive(Default)]
pub struct Callbacks<'a> {
    local_header: Option<Callback<'a, FileHeader>>,
    content: Option<Box<dyn FnMut(&FileHeader, &[u8]) + 'a>>,
    data_descriptor: Option<Box<dyn FnMut(&FileHeader, &DataDescriptor) + 'a>>,
    central_directory_header: Option<Callback<'a, CentralDirectoryHeader>>,
    end_of_central_directory: Option<Callback<'a, EndOfCentralDirectory>>,
}

impl<'a> Callbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_local_header(mut self, f: impl FnMut(&FileHeader) + 'a) -> Self {
        self.local_header = Some(Box::new(f));
        self
    }

    pub fn on_content(mut self, f: impl FnMut(&FileHeader, &[u8]) + 'a) -> Self {
        self.content = Some(Box::new(f));
        self
    }

    pub fn on_data_descriptor(
        mut self,
        f: impl FnMut(&FileHeader, &DataDescriptor) + 'a,
    ) -> Self {
        self.data_descriptor = Some(Box::new(f));
        self
    }

    pub fn on_central_directory_header(
        mut self,
        f: impl FnMut(&CentralDirectoryHeader) + 'a,
    ) -> Self {
        self.central_directory_header = Some(Box::new(f));
        self
    }

    pub fn on_end_of_central_directory(
        mut self,
        f: impl FnMut(&EndOfCentralDirectory) + 'a,
    ) -> Self {
        self.end_of_central_directory = Some(Box::new(f));
        self
    }
}

impl ZipVisitor for Callbacks<'_> {
    fn local_header(&mut self, header: &FileHeader) {
        if let Some(f) = self.local_header.as_mut() {
            f(header);
        }
    }

    fn content(&mut self, header: &FileHeader, data: &[u8]) {
        if let Some(f) = self.content.as_mut() {
            f(header, data);
        }
    }

    fn data_descriptor(&mut self, header: &FileHeader, descriptor: &DataDescriptor) {
        if let Some(f) = self.data_descriptor.as_mut() {
            f(header, descriptor);
        }
    }

    fn central_directory_header(&mut self, header: &CentralDirectoryHeader) {
        if let Some(f) = self.central_directory_header.as_mut() {
            f(header);
        }
    }

    fn end_of_central_directory(&mut self, eocd: &EndOfCentralDirectory) {
        if let Some(f) = self.end_of_central_directory.as_mut() {
            f(eocd);
        }
    }
}
