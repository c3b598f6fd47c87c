//! Method catalog: the Bot API methods the gateway knows by name.
//!
//! Each entry lists the positional parameters a call accepts ahead of its
//! option map and the shape of the call. Names outside the catalog can still
//! be sent through [`TelegramBot::call`](crate::client::TelegramBot::call).

use crate::error::BotError;
use std::fmt;
use std::str::FromStr;

/// How the gateway assembles a call's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Options forwarded as given.
    Plain,
    /// Default options merged underneath, `text` sanitized.
    Message,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSpec {
    pub method: Method,
    /// Remote method name, used verbatim in the endpoint URL.
    pub name: &'static str,
    /// Field names bound to positional arguments, in order.
    pub positional: &'static [&'static str],
    pub shape: Shape,
}

macro_rules! method_catalog {
    ($( $variant:ident => $name:literal, [$($pos:literal),*], $shape:ident; )*) => {
        /// Bot API methods known to the gateway.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Method {
            $( $variant, )*
        }

        /// Every known method, in declaration order.
        pub static CATALOG: &[MethodSpec] = &[
            $(
                MethodSpec {
                    method: Method::$variant,
                    name: $name,
                    positional: &[$($pos),*],
                    shape: Shape::$shape,
                },
            )*
        ];
    };
}

method_catalog! {
    // ── Bot ──────────────────────────────────────────────────────────
    GetMe => "getMe", [], Plain;
    LogOut => "logOut", [], Plain;
    Close => "close", [], Plain;
    SetMyCommands => "setMyCommands", [], Plain;
    GetMyCommands => "getMyCommands", [], Plain;

    // ── Sending ──────────────────────────────────────────────────────
    SendMessage => "sendMessage", ["text", "chat_id"], Message;
    ForwardMessage => "forwardMessage", [], Plain;
    CopyMessage => "copyMessage", [], Plain;
    SendPhoto => "sendPhoto", ["photo", "chat_id"], Plain;
    SendAudio => "sendAudio", [], Plain;
    SendDocument => "sendDocument", [], Plain;
    SendVideo => "sendVideo", [], Plain;
    SendAnimation => "sendAnimation", [], Plain;
    SendVoice => "sendVoice", [], Plain;
    SendVideoNote => "sendVideoNote", [], Plain;
    SendMediaGroup => "sendMediaGroup", [], Plain;
    SendSticker => "sendSticker", [], Plain;
    SendLocation => "sendLocation", [], Plain;
    SendVenue => "sendVenue", [], Plain;
    SendContact => "sendContact", [], Plain;
    SendPoll => "sendPoll", [], Plain;
    SendDice => "sendDice", [], Plain;
    SendChatAction => "sendChatAction", [], Plain;

    // ── Files / users ────────────────────────────────────────────────
    GetUserProfilePhotos => "getUserProfilePhotos", [], Plain;
    GetFile => "getFile", [], Plain;

    // ── Updates ──────────────────────────────────────────────────────
    GetUpdates => "getUpdates", [], Plain;
    SetWebhook => "setWebhook", [], Plain;
    DeleteWebhook => "deleteWebhook", [], Plain;
    GetWebhookInfo => "getWebhookInfo", [], Plain;

    // ── Chats & members ──────────────────────────────────────────────
    GetChat => "getChat", [], Plain;
    GetChatAdministrators => "getChatAdministrators", [], Plain;
    GetChatMembersCount => "getChatMembersCount", [], Plain;
    GetChatMemberCount => "getChatMemberCount", [], Plain;
    GetChatMember => "getChatMember", [], Plain;
    KickChatMember => "kickChatMember", [], Plain;
    BanChatMember => "banChatMember", [], Plain;
    UnbanChatMember => "unbanChatMember", [], Plain;
    RestrictChatMember => "restrictChatMember", [], Plain;
    PromoteChatMember => "promoteChatMember", [], Plain;
    SetChatPermissions => "setChatPermissions", [], Plain;
    ExportChatInviteLink => "exportChatInviteLink", [], Plain;
    SetChatPhoto => "setChatPhoto", [], Plain;
    DeleteChatPhoto => "deleteChatPhoto", [], Plain;
    SetChatTitle => "setChatTitle", [], Plain;
    SetChatDescription => "setChatDescription", [], Plain;
    PinChatMessage => "pinChatMessage", [], Plain;
    UnpinChatMessage => "unpinChatMessage", [], Plain;
    LeaveChat => "leaveChat", [], Plain;
    SetChatStickerSet => "setChatStickerSet", [], Plain;
    DeleteChatStickerSet => "deleteChatStickerSet", [], Plain;

    // ── Callbacks & inline ───────────────────────────────────────────
    AnswerCallbackQuery => "answerCallbackQuery", [], Plain;
    AnswerInlineQuery => "answerInlineQuery", [], Plain;

    // ── Editing ──────────────────────────────────────────────────────
    EditMessageText => "editMessageText", [], Plain;
    EditMessageCaption => "editMessageCaption", [], Plain;
    EditMessageMedia => "editMessageMedia", [], Plain;
    EditMessageReplyMarkup => "editMessageReplyMarkup", [], Plain;
    StopPoll => "stopPoll", [], Plain;
    DeleteMessage => "deleteMessage", [], Plain;

    // ── Stickers ─────────────────────────────────────────────────────
    GetStickerSet => "getStickerSet", [], Plain;
    UploadStickerFile => "uploadStickerFile", [], Plain;

    // ── Games ────────────────────────────────────────────────────────
    SendGame => "sendGame", [], Plain;
    SetGameScore => "setGameScore", [], Plain;
    GetGameHighScores => "getGameHighScores", [], Plain;
    Game => "Game", [], Plain;
    Animation => "Animation", [], Plain;
    CallbackGame => "CallbackGame", [], Plain;
    GameHighScore => "GameHighScore", [], Plain;
}

impl Method {
    pub fn spec(self) -> &'static MethodSpec {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn positional(self) -> &'static [&'static str] {
        self.spec().positional
    }

    pub fn shape(self) -> Shape {
        self.spec().shape
    }

    /// Look up a method by its exact remote name.
    pub fn from_name(name: &str) -> Option<Method> {
        CATALOG.iter().find(|s| s.name == name).map(|s| s.method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::from_name(s).ok_or_else(|| BotError::InvalidParams(format!("unknown method '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn spec_index_matches_variant() {
        for spec in CATALOG {
            assert_eq!(spec.method.spec(), spec);
        }
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), CATALOG.len());
        assert!(CATALOG.len() >= 60);
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(Method::from_name("getMe"), Some(Method::GetMe));
        assert_eq!(Method::from_name("restrictChatMember"), Some(Method::RestrictChatMember));
        assert_eq!(Method::from_name("getme"), None);
        assert_eq!("sendPhoto".parse::<Method>().unwrap(), Method::SendPhoto);
        assert!(matches!("nope".parse::<Method>(), Err(BotError::InvalidParams(_))));
    }

    #[test]
    fn message_shape_only_for_send_message() {
        let message: Vec<_> = CATALOG
            .iter()
            .filter(|s| s.shape == Shape::Message)
            .map(|s| s.name)
            .collect();
        assert_eq!(message, vec!["sendMessage"]);
    }

    #[test]
    fn positional_parameters() {
        assert_eq!(Method::SendMessage.positional(), &["text", "chat_id"]);
        assert_eq!(Method::SendPhoto.positional(), &["photo", "chat_id"]);
        assert!(Method::GetChat.positional().is_empty());
    }

    #[test]
    fn display_uses_remote_name() {
        assert_eq!(Method::GetChatAdministrators.to_string(), "getChatAdministrators");
        assert_eq!(Method::GameHighScore.to_string(), "GameHighScore");
    }
}
