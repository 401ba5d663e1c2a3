//! CSV line tokenizer.
//! Splits normalized text into a table of string cells, honoring double-quote
//! quoting and `""` escapes.

/// Splits one line (no embedded newline) into field strings.
///
/// Inside quotes a doubled quote is a literal quote and a single quote toggles
/// back out; outside quotes a comma terminates the field and a quote toggles
/// in without touching accumulated content. End of line always terminates the
/// final field, so a line with N commas yields N + 1 fields.
///
/// Embedded newlines within quoted fields are not handled here; callers must
/// join continuation lines before tokenizing.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut characters = line.chars().peekable();
    while let Some(character) = characters.next() {
        if in_quotes {
            match character {
                '"' if characters.peek() == Some(&'"') => {
                    field.push('"');
                    characters.next();
                }
                '"' => in_quotes = false,
                _ => field.push(character),
            }
        } else {
            match character {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                _ => field.push(character),
            }
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_unquoted_fields() {
        assert_eq!(tokenize_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokenize_quoted_comma() {
        assert_eq!(tokenize_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn tokenize_escaped_quote() {
        assert_eq!(tokenize_line("a,\"b\"\"c\",d"), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn tokenize_commas_yield_one_more_field() {
        assert_eq!(tokenize_line("").len(), 1);
        assert_eq!(tokenize_line(",").len(), 2);
        assert_eq!(tokenize_line("a,b,").len(), 3);
        assert_eq!(tokenize_line(",,,").len(), 4);
    }

    #[test]
    fn tokenize_quote_mid_field_keeps_accumulated_content() {
        assert_eq!(tokenize_line("ab\"c,d\"e"), vec!["abc,de"]);
    }
}
