//! Text shown on the gift screens.

use gift_core::Screen;

pub const HOME_TITLE: &str = "Please accept my gift";
pub const HOME_ACCEPT: &str = "Accept";
pub const HOME_REJECT: &str = "Decline";

pub const HOW_DARE_TITLE: &str = "How dare you!";
pub const HOW_DARE_RETRY: &str = "Try again";

pub const PRESENTS_TITLE: &str = "Gifts for you";
pub const PRESENTS_HINT: &str = "Pick a gift to open it";

/// Gift boxes on the present selection screen, in display order.
pub const PRESENTS: [(Screen, &str, &str); 4] = [
    (Screen::Song, "🌸", "A flower"),
    (Screen::PictureAnimation, "💑", "The two of us"),
    (Screen::Letter, "🐱", "A surprise"),
    (Screen::PhotoBooth, "📸", "Photo booth"),
];

pub const SONG_TITLE: &str = "Unforgettable song";

/// Playlist on the song screen: title and length in seconds.
pub const TRACKS: [(&str, u64); 3] = [
    ("Unforgettable song", 225),
    ("The night we met", 208),
    ("Still shy", 194),
];

pub const SONG_NOTE: [&str; 4] = [
    "Do you remember our first kiss?",
    "You played this song that night. I can still feel the moment so clearly, the way \
     everything around us seemed to fade until it was just you and me. I was nervous, but \
     somehow everything felt right, like time paused just for us.",
    "It makes me so happy every time I think about it. Whenever I play this song, it takes \
     me back to that exact feeling: the rush, the calm, and the little flutter in my chest \
     that hasn't gone away since.",
    "Even now, it still makes me shy, but in the best way, because that memory reminds me \
     just how special you are to me.",
];

pub const LETTER_INTRO_TITLE: &str = "💖 There's a gift for you 💖";
pub const LETTER_INTRO_HINT: &str = "Press Enter to open it";
pub const LETTER_DONE: &str = "💖 Happy Anniversary, my everything 💖";

pub const LOVE_TITLE: &str = "Love you";
pub const LOVE_SUBTITLE: &str = "You are my special person";

pub const LOVE_MESSAGES: [&str; 10] = [
    "We may not be together yet, but my heart is already yours 💕",
    "You are the most special person in my life",
    "Every time I see you smile, my world gets brighter",
    "I don't know what the future holds, but right now I want you by my side",
    "You make my heart race every time we meet",
    "I just want you to know... I love you",
    "Whatever we are, I will always love you",
    "You are my dream come true",
    "Every day with you is a special day",
    "I want to be the one who makes you smile every day",
];

pub const PICTURES_WORD: [char; 8] = ['I', 'L', 'O', 'V', 'E', 'Y', 'O', 'U'];

pub const BOOTH_TITLE: &str = "📸 Photo booth";
pub const BOOTH_EMPTY: &str = "No memories yet. Finish a gift to keep one here.";

pub const GALLERY_EMPTY: &str = "Nothing saved yet";
pub const GALLERY_EMPTY_HINT: &str = "Press s on any screen to keep a memory";

pub const TOAST_PICTURE_SAVED: &str = "💾 Picture saved!";
pub const TOAST_MESSAGE_SAVED: &str = "💝 Favourite message saved!";
pub const TOAST_MEMORY_SAVED: &str = "💖 Memory kept in the photo booth";
pub const TOAST_SAVE_FAILED: &str = "❌ Could not save";
