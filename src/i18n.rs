//! User-Facing Text
//!
//! Every string a view shows, in each supported locale.

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::str::FromStr;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ru" => Ok(Locale::Ru),
            "en" => Ok(Locale::En),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

/// Message keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    FillAllFields,
    LoginFailed,
    RegisterFailed,
    LoginToRead,
    LoginToSend,
    SessionExpired,
    MessagesLoadFailed,
    MessageSendFailed,
    NoMessagesYet,
    LoadingMessages,
    UnknownUser,
    LoadingProfile,
    ProfileLoadFailed,
    MemberNotFound,
    NotSignedIn,
    AlreadySignedIn,
    SignedIn,
    SignedOut,
    JoinedAt,
}

impl Locale {
    pub fn text(self, key: Text) -> &'static str {
        match self {
            Locale::Ru => match key {
                Text::FillAllFields => "Пожалуйста, заполните все поля.",
                Text::LoginFailed => "Неверное имя пользователя или пароль.",
                Text::RegisterFailed => "Произошла ошибка при регистрации. Попробуйте ещё раз.",
                Text::LoginToRead => {
                    "Чтобы просматривать сообщения, войдите или зарегистрируйтесь."
                }
                Text::LoginToSend => "Чтобы отправлять сообщения, войдите или зарегистрируйтесь.",
                Text::SessionExpired => "Сессия истекла. Пожалуйста, войдите снова.",
                Text::MessagesLoadFailed => {
                    "Не удалось загрузить сообщения. Попробуйте обновить страницу."
                }
                Text::MessageSendFailed => "Не удалось отправить сообщение. Попробуйте ещё раз.",
                Text::NoMessagesYet => "Сообщений пока нет. Напишите первое сообщение!",
                Text::LoadingMessages => "Загрузка сообщений...",
                Text::UnknownUser => "Неизвестный пользователь",
                Text::LoadingProfile => "Загрузка профиля...",
                Text::ProfileLoadFailed => {
                    "Не удалось загрузить профиль. Попробуйте обновить страницу."
                }
                Text::MemberNotFound => "Пользователь не найден.",
                Text::NotSignedIn => "Вы не вошли в систему.",
                Text::AlreadySignedIn => "Вы уже вошли как",
                Text::SignedIn => "Вы вошли как",
                Text::SignedOut => "Вы вышли из системы.",
                Text::JoinedAt => "Дата регистрации:",
            },
            Locale::En => match key {
                Text::FillAllFields => "Please fill in all fields.",
                Text::LoginFailed => "Invalid username or password.",
                Text::RegisterFailed => "Registration failed. Please try again.",
                Text::LoginToRead => "Log in or register to read messages.",
                Text::LoginToSend => "Log in or register to send messages.",
                Text::SessionExpired => "Your session has expired. Please log in again.",
                Text::MessagesLoadFailed => "Could not load messages. Try refreshing.",
                Text::MessageSendFailed => "Could not send the message. Please try again.",
                Text::NoMessagesYet => "No messages yet. Write the first one!",
                Text::LoadingMessages => "Loading messages...",
                Text::UnknownUser => "Unknown user",
                Text::LoadingProfile => "Loading profile...",
                Text::ProfileLoadFailed => "Could not load the profile. Try refreshing.",
                Text::MemberNotFound => "User not found.",
                Text::NotSignedIn => "You are not logged in.",
                Text::AlreadySignedIn => "Already logged in as",
                Text::SignedIn => "Logged in as",
                Text::SignedOut => "Logged out.",
                Text::JoinedAt => "Joined:",
            },
        }
    }

    /// Render a server timestamp in local time; empty when absent
    pub fn format_timestamp(self, at: Option<DateTime<Utc>>) -> String {
        let Some(at) = at else {
            return String::new();
        };
        let local = at.with_timezone(&Local);
        match self {
            Locale::Ru => local.format("%d.%m.%Y, %H:%M:%S").to_string(),
            Locale::En => local.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
