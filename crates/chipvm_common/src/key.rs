/// Physical host keys that frontends know how to report.
///
/// Only the keys used by the 4x4 keypad layout are listed; everything else
/// maps to `Key::None`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    Q,
    W,
    E,
    R,
    A,
    S,
    D,
    F,
    Z,
    X,
    C,
    V,
    Escape,
    None,
}

impl Key {
    /// Parse a key name as used in scripts and on the command line.
    ///
    /// Names are case-insensitive: `1`..`4`, the letters of the keypad block,
    /// and `esc`/`escape`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.to_ascii_lowercase().as_str() {
            "1" => Key::Num1,
            "2" => Key::Num2,
            "3" => Key::Num3,
            "4" => Key::Num4,
            "q" => Key::Q,
            "w" => Key::W,
            "e" => Key::E,
            "r" => Key::R,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "f" => Key::F,
            "z" => Key::Z,
            "x" => Key::X,
            "c" => Key::C,
            "v" => Key::V,
            "esc" | "escape" => Key::Escape,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::Key;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Key::from_name("Q"), Some(Key::Q));
        assert_eq!(Key::from_name("q"), Some(Key::Q));
        assert_eq!(Key::from_name("4"), Some(Key::Num4));
        assert_eq!(Key::from_name("ESC"), Some(Key::Escape));
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(Key::from_name("5"), None);
        assert_eq!(Key::from_name(""), None);
        assert_eq!(Key::from_name("space"), None);
    }
}
