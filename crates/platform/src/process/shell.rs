//! POSIX shell quoting

use std::borrow::Cow;

/// Quote `s` so a POSIX shell reads it back as exactly one word
///
/// The value is wrapped in single quotes; each embedded single quote closes
/// the quoting, emits an escaped quote and reopens it.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

/// `s` as it should appear in a traced command line
///
/// Words made only of characters the shell never interprets are left bare;
/// anything else is quoted.
#[must_use]
pub fn quote_if_needed(s: &str) -> Cow<'_, str> {
    let bare = !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"_@%+=:,./-".contains(&b));
    if bare {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(quote(s))
    }
}

/// Quote every element and join with spaces
#[must_use]
pub fn quote_all<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::process::Command;

    fn shell_words(script_args: &str) -> String {
        let script = format!("set -- {script_args}; printf '%s' \"$#:$1\"");
        let output = Command::new("sh").arg("-c").arg(script).output().unwrap();
        String::from_utf8(output.stdout).unwrap()
    }

    /// Arguments the shell sees after word splitting `script_args`
    fn shell_argv(script_args: &str) -> Vec<String> {
        let script = format!("set -- {script_args}; printf '%s\\0' \"$@\"");
        let output = Command::new("sh").arg("-c").arg(script).output().unwrap();
        String::from_utf8(output.stdout)
            .unwrap()
            .split_terminator('\0')
            .map(String::from)
            .collect()
    }

    #[test]
    fn quotes_plain_and_special_strings() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("it's"), "'it'\\''s'");
        assert_eq!(quote_all(["a b", "c"]), "'a b' 'c'");
    }

    #[test]
    fn shell_reads_quoted_value_as_one_word() {
        for s in ["", "two words", "$HOME", "a'b", "\"q\"", "*", "x;y", "-conf"] {
            assert_eq!(shell_words(&quote(s)), format!("1:{s}"));
        }
    }

    #[test]
    fn traced_words_are_quoted_only_when_needed() {
        assert_eq!(quote_if_needed("world.opt"), "world.opt");
        assert_eq!(quote_if_needed("-j4"), "-j4");
        assert_eq!(quote_if_needed("C:/ocamlmgw-12"), "C:/ocamlmgw-12");
        assert_eq!(quote_if_needed(""), "''");
        assert_eq!(quote_if_needed("my fix.patch"), "'my fix.patch'");
        assert_eq!(quote_if_needed("$PARALLEL"), "'$PARALLEL'");
    }

    /// Words that carry single quotes and other shell metacharacters
    fn quoted_word() -> impl Strategy<Value = String> {
        ("[a-z '\"$\\\\ ;*]{0,12}", "[a-z '\"$\\\\ ;*]{0,12}")
            .prop_map(|(head, tail)| format!("{head}'{tail}"))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn quote_round_trips_through_sh(s in quoted_word()) {
            prop_assert_eq!(shell_words(&quote(&s)), format!("1:{s}"));
        }

        #[test]
        fn quote_all_round_trips_sequences(
            words in prop::collection::vec(prop_oneof![quoted_word(), "\\PC{0,8}"], 0..6)
        ) {
            prop_assert_eq!(shell_argv(&quote_all(&words)), words);
        }
    }
}
