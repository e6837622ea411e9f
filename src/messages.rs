//! User-facing text in each supported locale.

use supper_core::{GeolocationError, Locale};

pub fn title(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "What's for dinner?",
        Locale::ZhTw => "晚餐吃甚麼？",
    }
}

pub fn locating(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Getting your location...",
        Locale::ZhTw => "正在取得您的位置...",
    }
}

pub fn searching(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Great! Looking for restaurants near you...",
        Locale::ZhTw => "太棒了！正在為您尋找附近的餐廳...",
    }
}

pub fn nothing_found(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "Sorry, no recommended restaurants were found nearby.",
        Locale::ZhTw => "抱歉，附近找不到推薦的餐廳。",
    }
}

pub fn error_heading(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "An error occurred",
        Locale::ZhTw => "發生錯誤",
    }
}

/// One distinct message per geolocation failure category.
pub fn geolocation(locale: Locale, error: GeolocationError) -> &'static str {
    match (locale, error) {
        (Locale::En, GeolocationError::PermissionDenied) => {
            "You denied location access. Please enable it in your settings."
        }
        (Locale::En, GeolocationError::PositionUnavailable) => {
            "Unable to get your location information."
        }
        (Locale::En, GeolocationError::Timeout) => "Getting your location timed out.",
        (Locale::En, GeolocationError::Unknown) => {
            "An unknown error occurred while getting your location."
        }
        (Locale::ZhTw, GeolocationError::PermissionDenied) => {
            "您拒絕了位置存取權限。請在設定中啟用它。"
        }
        (Locale::ZhTw, GeolocationError::PositionUnavailable) => "無法取得您的位置資訊。",
        (Locale::ZhTw, GeolocationError::Timeout) => "取得位置資訊超時。",
        (Locale::ZhTw, GeolocationError::Unknown) => "取得位置時發生未知錯誤。",
    }
}
