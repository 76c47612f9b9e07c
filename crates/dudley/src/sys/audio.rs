use clockwork::chimes::{Clip, ClipId, LoadFailure};
use glib::error::ErrorDomain;
use gtk::gio;
use gtk::prelude::*;
use gtk4 as gtk;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ClipStatus {
    Ready,
    Failed(LoadFailure, String),
}

/// A chime clip backed by a [`gtk::MediaFile`].
#[derive(Debug, Clone)]
pub struct MediaClip {
    id: ClipId,
    media: gtk::MediaFile,
}

impl MediaClip {
    pub fn open(dir: &Path, id: ClipId) -> Self {
        let path = dir.join(id.source().as_str());
        log::debug!("Loading {} from {}", id, path.display());
        Self {
            id,
            media: gtk::MediaFile::for_filename(&path),
        }
    }

    /// Reports when the stream is prepared or fails.
    pub fn watch<F: Fn(ClipId, ClipStatus) + 'static>(&self, notify: F) {
        let notify = Rc::new(notify);
        let id = self.id;

        {
            let notify = notify.clone();
            self.media.connect_prepared_notify(move |media| {
                if media.is_prepared() {
                    notify(id, ClipStatus::Ready);
                }
            });
        }

        self.media.connect_error_notify(move |media| {
            if let Some(err) = media.error() {
                notify(
                    id,
                    ClipStatus::Failed(classify(&err), err.message().to_string()),
                );
            }
        });
    }
}

impl Clip for MediaClip {
    fn play(&self) {
        if self.media.is_ended() {
            self.media.seek(0);
        }
        self.media.play();
    }

    fn pause(&self) {
        self.media.pause();
    }

    fn set_looping(&self, looping: bool) {
        self.media.set_loop(looping);
    }
}

/// `GstResourceError` codes, as forwarded by the GStreamer media backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
enum GstResourceError {
    Failed = 1,
    TooLazy = 2,
    NotFound = 3,
    Busy = 4,
    OpenRead = 5,
    OpenWrite = 6,
    OpenReadWrite = 7,
    Close = 8,
    Read = 9,
    Write = 10,
    Seek = 11,
    Sync = 12,
    Settings = 13,
    NoSpaceLeft = 14,
    NotAuthorized = 15,
}

impl ErrorDomain for GstResourceError {
    fn domain() -> glib::Quark {
        glib::Quark::from_str("gst-resource-error-quark")
    }

    fn code(self) -> i32 {
        self as i32
    }

    fn from(code: i32) -> Option<Self> {
        use GstResourceError::*;
        [
            Failed,
            TooLazy,
            NotFound,
            Busy,
            OpenRead,
            OpenWrite,
            OpenReadWrite,
            Close,
            Read,
            Write,
            Seek,
            Sync,
            Settings,
            NoSpaceLeft,
            NotAuthorized,
        ]
        .into_iter()
        .find(|e| *e as i32 == code)
    }
}

/// `GstStreamError` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
enum GstStreamError {
    Failed = 1,
    TooLazy = 2,
    NotImplemented = 3,
    TypeNotFound = 4,
    WrongType = 5,
    CodecNotFound = 6,
    Decode = 7,
    Encode = 8,
    Demux = 9,
    Mux = 10,
    Format = 11,
    Decrypt = 12,
    DecryptNoKey = 13,
}

impl ErrorDomain for GstStreamError {
    fn domain() -> glib::Quark {
        glib::Quark::from_str("gst-stream-error-quark")
    }

    fn code(self) -> i32 {
        self as i32
    }

    fn from(code: i32) -> Option<Self> {
        use GstStreamError::*;
        [
            Failed,
            TooLazy,
            NotImplemented,
            TypeNotFound,
            WrongType,
            CodecNotFound,
            Decode,
            Encode,
            Demux,
            Mux,
            Format,
            Decrypt,
            DecryptNoKey,
        ]
        .into_iter()
        .find(|e| *e as i32 == code)
    }
}

fn classify(err: &glib::Error) -> LoadFailure {
    if err.domain() == GstResourceError::domain() {
        return LoadFailure::Network;
    }
    if let Some(code) = err.kind::<GstStreamError>() {
        return match code {
            GstStreamError::NotImplemented
            | GstStreamError::TypeNotFound
            | GstStreamError::WrongType
            | GstStreamError::CodecNotFound => LoadFailure::Unsupported,
            _ => LoadFailure::Decode,
        };
    }
    match err.kind::<gio::IOErrorEnum>() {
        Some(gio::IOErrorEnum::Cancelled) => LoadFailure::Aborted,
        Some(
            gio::IOErrorEnum::NotFound
            | gio::IOErrorEnum::PermissionDenied
            | gio::IOErrorEnum::HostNotFound
            | gio::IOErrorEnum::ConnectionRefused
            | gio::IOErrorEnum::NetworkUnreachable
            | gio::IOErrorEnum::TimedOut,
        ) => LoadFailure::Network,
        Some(gio::IOErrorEnum::NotSupported) => LoadFailure::Unsupported,
        _ => LoadFailure::Decode,
    }
}
