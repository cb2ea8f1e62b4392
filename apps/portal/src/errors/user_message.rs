//! Maps client errors to the text shown in notifications.
//!
//! Transport statuses are checked first, then envelope codes. Both resolve
//! through one flat table of [`MessageKey`]s with a Turkish and an English
//! rendering.

use crate::error::ClientError;
use crate::errors::ResponseCode;
use crate::i18n::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    SessionExpired,
    Unauthorized,
    NotFound,
    AlreadyExists,
    InvalidData,
    TooManyRequests,
    ServerError,
    Generic,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub key: MessageKey,
    pub title: &'static str,
    pub description: String,
}

/// Title and default description per locale.
fn text(key: MessageKey, locale: Locale) -> (&'static str, &'static str) {
    match (key, locale) {
        (MessageKey::SessionExpired, Locale::Tr) => ("Oturum süreniz doldu", "Lütfen tekrar giriş yapın"),
        (MessageKey::SessionExpired, Locale::En) => ("Your session has expired", "Please log in again"),
        (MessageKey::Unauthorized, Locale::Tr) => ("Yetkisiz erişim", "Bu işlem için yetkiniz bulunmuyor"),
        (MessageKey::Unauthorized, Locale::En) => ("Unauthorized access", "You are not allowed to do this"),
        (MessageKey::NotFound, Locale::Tr) => ("Bulunamadı", "İstenen kaynak bulunamadı"),
        (MessageKey::NotFound, Locale::En) => ("Not found", "The requested resource was not found"),
        (MessageKey::AlreadyExists, Locale::Tr) => ("Zaten mevcut", "Bu kayıt zaten mevcut"),
        (MessageKey::AlreadyExists, Locale::En) => ("Already exists", "This record already exists"),
        (MessageKey::InvalidData, Locale::Tr) => ("Geçersiz veri", "Gönderilen veriler geçersiz"),
        (MessageKey::InvalidData, Locale::En) => ("Invalid data", "The submitted data is invalid"),
        (MessageKey::TooManyRequests, Locale::Tr) => ("Çok fazla istek", "Lütfen bir süre bekleyip tekrar deneyin"),
        (MessageKey::TooManyRequests, Locale::En) => ("Too many requests", "Please wait a moment and try again"),
        (MessageKey::ServerError, Locale::Tr) => ("Sunucu hatası", "Bir hata oluştu, lütfen daha sonra tekrar deneyin"),
        (MessageKey::ServerError, Locale::En) => ("Server error", "Something went wrong, please try again later"),
        (MessageKey::Generic, Locale::Tr) => ("Bir hata oluştu", "Lütfen tekrar deneyin"),
        (MessageKey::Generic, Locale::En) => ("An error occurred", "Please try again"),
        (MessageKey::Unexpected, Locale::Tr) => ("Beklenmeyen bir hata oluştu", "Lütfen tekrar deneyin"),
        (MessageKey::Unexpected, Locale::En) => ("An unexpected error occurred", "Please try again"),
    }
}

fn key_for(err: &ClientError) -> MessageKey {
    match err {
        ClientError::SessionExpired => MessageKey::SessionExpired,
        ClientError::Http { status } => match status {
            401 => MessageKey::SessionExpired,
            403 => MessageKey::Unauthorized,
            404 => MessageKey::NotFound,
            422 => MessageKey::InvalidData,
            429 => MessageKey::TooManyRequests,
            500 | 502 | 503 => MessageKey::ServerError,
            _ => MessageKey::Generic,
        },
        ClientError::Api { code, .. } => match code {
            ResponseCode::Unauthenticated => MessageKey::SessionExpired,
            ResponseCode::Unauthorized | ResponseCode::Forbidden => MessageKey::Unauthorized,
            ResponseCode::NotFound => MessageKey::NotFound,
            ResponseCode::Exists => MessageKey::AlreadyExists,
            ResponseCode::InvalidRequest => MessageKey::InvalidData,
            ResponseCode::InternalError => MessageKey::ServerError,
            ResponseCode::Success | ResponseCode::ServiceSpecified => MessageKey::Generic,
        },
        ClientError::Validation(_) => MessageKey::InvalidData,
        ClientError::PermissionDenied { .. } => MessageKey::Unauthorized,
        ClientError::Network(_)
        | ClientError::Decode { .. }
        | ClientError::Config { .. }
        | ClientError::Storage { .. } => MessageKey::Unexpected,
    }
}

/// Whether the error's own message is more useful than the canned text.
fn carries_detail(err: &ClientError, key: MessageKey) -> bool {
    match err {
        ClientError::Validation(_) => true,
        ClientError::Http { status: 422 } => false,
        ClientError::Api { .. } => matches!(key, MessageKey::InvalidData | MessageKey::Generic),
        _ => false,
    }
}

pub fn user_message(err: &ClientError, locale: Locale) -> UserMessage {
    let key = key_for(err);
    let (title, default_description) = text(key, locale);
    let description = if carries_detail(err, key) {
        err.to_string()
    } else {
        default_description.to_string()
    };
    UserMessage {
        key,
        title,
        description,
    }
}
