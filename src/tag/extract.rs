//! Sequential scanner for comment tags

use crate::error::InjectError;

use super::types::{Tag, TagSpan};

const COMMENT_OPEN: &str = "<!-- ";
const COMMENT_CLOSE: &str = " -->";

/// Find every occurrence of the tag `name` in `text`, left to right
///
/// With `has_body` the start marker is `<!-- NAME_START ... -->` and the tag
/// extends to the next `<!-- NAME_END -->`. The scan resumes after each tag,
/// so same-named tags nested inside a body are not matched separately.
///
/// No occurrence is not an error; an empty list is returned.
pub fn extract_tags(text: &str, name: &str, has_body: bool) -> Result<Vec<Tag>, InjectError> {
    let marker_name = if has_body {
        format!("{}_START", name)
    } else {
        name.to_string()
    };

    let mut tags = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_start_marker(text, &marker_name, cursor)? {
        let properties = parse_properties(text, &marker_name, start)?;

        let tag = if has_body {
            let end = find_end_marker(text, name, start.end).ok_or_else(|| {
                InjectError::MissingEndTag {
                    tag: name.to_string(),
                    span: start.range(),
                }
            })?;
            let content = text[start.end..end.start].to_string();
            Tag::with_body(name, properties, content, start, end)
        } else {
            Tag::single(name, properties, start)
        };

        cursor = tag.end_offset();
        tags.push(tag);
    }

    Ok(tags)
}

/// Locate the next `<!-- NAME ` prefix and its closing ` -->`
fn find_start_marker(
    text: &str,
    marker_name: &str,
    from: usize,
) -> Result<Option<TagSpan>, InjectError> {
    let prefix = format!("{}{} ", COMMENT_OPEN, marker_name);
    let Some(start) = find_ignore_ascii_case(text, &prefix, from) else {
        return Ok(None);
    };
    let prefix_end = start + prefix.len();

    let close = find_ignore_ascii_case(text, COMMENT_CLOSE, start).ok_or_else(|| {
        InjectError::TagNotClosed {
            tag: marker_name.to_string(),
            span: start..prefix_end,
        }
    })?;

    Ok(Some(TagSpan::new(start, prefix_end, close + COMMENT_CLOSE.len())))
}

fn find_end_marker(text: &str, name: &str, from: usize) -> Option<TagSpan> {
    let prefix = format!("{}{}_END ", COMMENT_OPEN, name);
    let marker = format!("{}-->", prefix);
    let start = find_ignore_ascii_case(text, &marker, from)?;
    Some(TagSpan::new(start, start + prefix.len(), start + marker.len()))
}

/// Parse `key='value'` pairs between the marker prefix and its ` -->`
fn parse_properties(
    text: &str,
    marker_name: &str,
    span: TagSpan,
) -> Result<Vec<(String, String)>, InjectError> {
    let close = span.end - COMMENT_CLOSE.len();
    let mut properties: Vec<(String, String)> = Vec::new();
    let mut position = span.prefix_end;

    while let Some(equals) = find_from(text, "=", position) {
        if equals >= close {
            break;
        }

        let key = text[position..equals].trim();

        // Quotes are looked for from the `=` onwards, even past the marker
        let open = find_from(text, "'", equals).ok_or_else(|| InjectError::MissingOpeningQuote {
            key: key.to_string(),
            span: span.range(),
        })?;
        let closing =
            find_from(text, "'", open + 1).ok_or_else(|| InjectError::MissingClosingQuote {
                key: key.to_string(),
                span: span.range(),
            })?;

        if properties.iter().any(|(k, _)| k == key) {
            return Err(InjectError::DuplicateProperty {
                tag: marker_name.to_string(),
                key: key.to_string(),
                span: span.range(),
            });
        }
        properties.push((key.to_string(), text[open + 1..closing].to_string()));

        position = closing + 1;
    }

    Ok(properties)
}

fn find_from(text: &str, needle: &str, from: usize) -> Option<usize> {
    text.get(from..)?.find(needle).map(|i| from + i)
}

/// Byte offset of the next ASCII case-insensitive match of `needle` at or after `from`
///
/// Matches always start and end on char boundaries: non-ASCII bytes only
/// compare equal to themselves.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from > hay.len() || hay.len() - from < needle.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const NAME: &str = "a_tag_name";

    fn props(tag: &Tag) -> HashMap<&str, &str> {
        tag.properties().collect()
    }

    #[test]
    fn test_empty_string() {
        assert!(extract_tags("", NAME, false).unwrap().is_empty());
        assert!(extract_tags("", NAME, true).unwrap().is_empty());
    }

    #[test]
    fn test_no_tags() {
        assert!(extract_tags("some test text", NAME, false).unwrap().is_empty());
    }

    #[test]
    fn test_marker_without_space_is_ignored() {
        let tags = extract_tags("some test text <!--a_tag_name--> and some more text", NAME, false)
            .unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_missing_comment_end() {
        let err = extract_tags("some test text <!-- a_tag_name and some more text", NAME, false)
            .unwrap_err();
        assert_eq!(err.to_string(), "a_tag_name tag not closed");
    }

    #[test]
    fn test_one_tag() {
        let tags = extract_tags("some test text <!-- a_tag_name --> and some more text", NAME, false)
            .unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 34));
        assert_eq!(tags[0].end_span(), None);
        assert_eq!(tags[0].content(), None);
        assert_eq!(tags[0].property_count(), 0);
    }

    #[test]
    fn test_tags_at_start_middle_and_end() {
        let text = "<!-- a_tag_name -->some search text<!-- a_tag_name --> and some more text<!-- a_tag_name -->";
        let spans: Vec<_> = extract_tags(text, NAME, false)
            .unwrap()
            .iter()
            .map(Tag::start_span)
            .collect();
        assert_eq!(
            spans,
            vec![
                TagSpan::new(0, 16, 19),
                TagSpan::new(35, 51, 54),
                TagSpan::new(73, 89, 92),
            ]
        );
    }

    #[test]
    fn test_adjacent_tags() {
        let text = "some test text <!-- a_tag_name --><!-- a_tag_name --> and some more text";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 34));
        assert_eq!(tags[1].start_span(), TagSpan::new(34, 50, 53));
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let text = "x <!-- A_Tag_Name Key='Value' --> y";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name(), NAME);
        assert_eq!(tags[0].property("Key"), Some("Value"));
        assert_eq!(tags[0].property("key"), None);
    }

    #[test]
    fn test_longer_name_does_not_match() {
        let text = "<!-- a_tag_name_VALUE k='v' -->";
        assert!(extract_tags(text, NAME, false).unwrap().is_empty());
    }

    #[test]
    fn test_one_property() {
        let text = "some test text <!-- a_tag_name property0='some value' --> and some more text";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 57));
        assert_eq!(props(&tags[0]), HashMap::from([("property0", "some value")]));
    }

    #[test]
    fn test_empty_property_value() {
        let text = "some test text <!-- a_tag_name property0='' --> and some more text";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 47));
        assert_eq!(tags[0].property("property0"), Some(""));
    }

    #[test]
    fn test_two_properties_without_space() {
        let text = "some test text <!-- a_tag_name property0='some value'property1='another value' --> and some more text";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 82));
        assert_eq!(
            props(&tags[0]),
            HashMap::from([("property0", "some value"), ("property1", "another value")])
        );
    }

    #[test]
    fn test_property_order_does_not_matter() {
        let a = extract_tags("<!-- a_tag_name key0='a' key1='b' -->", NAME, false).unwrap();
        let b = extract_tags("<!-- a_tag_name key1='b' key0='a' -->", NAME, false).unwrap();
        assert_eq!(props(&a[0]), props(&b[0]));
        assert_eq!(props(&a[0]), HashMap::from([("key0", "a"), ("key1", "b")]));
    }

    #[test]
    fn test_properties_of_two_tags() {
        let text = "some test text <!-- a_tag_name tag0property0='some value' --> <!-- a_tag_name tag1Property0='another value' tag1Property1='yet another value' --> and some more text";
        let tags = extract_tags(text, NAME, false).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 31, 61));
        assert_eq!(props(&tags[0]), HashMap::from([("tag0property0", "some value")]));
        assert_eq!(tags[1].start_span(), TagSpan::new(62, 78, 145));
        assert_eq!(
            props(&tags[1]),
            HashMap::from([
                ("tag1Property0", "another value"),
                ("tag1Property1", "yet another value")
            ])
        );
    }

    #[test]
    fn test_equals_after_marker_is_not_a_property() {
        let tags = extract_tags("<!-- a_tag_name --> x='1'", NAME, false).unwrap();
        assert_eq!(tags[0].property_count(), 0);
    }

    #[test]
    fn test_quoted_value_may_follow_marker_close() {
        let tags = extract_tags("<!-- a_tag_name k= --> 'v'", NAME, false).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].property("k"), Some("v"));
        assert_eq!(tags[0].start_span(), TagSpan::new(0, 16, 22));
    }

    #[test]
    fn test_quotes_before_late_equals_are_ignored() {
        let tags = extract_tags("<!-- a_tag_name 'q' --> x='1'", NAME, false).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].property_count(), 0);
        assert_eq!(tags[0].start_span(), TagSpan::new(0, 16, 23));
    }

    #[test]
    fn test_missing_first_quote() {
        let text = "some test text <!-- a_tag_name property0= --> and some more text";
        let err = extract_tags(text, NAME, false).unwrap_err();
        assert!(matches!(err, InjectError::MissingOpeningQuote { ref key, .. } if key == "property0"));
    }

    #[test]
    fn test_missing_second_quote() {
        let text = "some test text <!-- a_tag_name property0=' --> and some more text";
        let err = extract_tags(text, NAME, false).unwrap_err();
        assert!(matches!(err, InjectError::MissingClosingQuote { .. }));
    }

    #[test]
    fn test_duplicate_property_key() {
        let err = extract_tags("<!-- a_tag_name k='1' k='2' -->", NAME, false).unwrap_err();
        assert!(matches!(err, InjectError::DuplicateProperty { ref key, .. } if key == "k"));
    }

    #[test]
    fn test_one_tag_with_content() {
        let text = "some test text <!-- a_tag_name_START -->some content<!-- a_tag_name_END --> and some more text";
        let tags = extract_tags(text, NAME, true).unwrap();
        assert_eq!(tags.len(), 1);
        assert!(tags[0].has_body());
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 37, 40));
        assert_eq!(tags[0].end_span(), Some(TagSpan::new(52, 72, 75)));
        assert_eq!(tags[0].content(), Some("some content"));
        assert_eq!(tags[0].outer_span(), 15..75);
    }

    #[test]
    fn test_empty_content() {
        let text = "some test text <!-- a_tag_name_START --><!-- a_tag_name_END --> and some more text";
        let tags = extract_tags(text, NAME, true).unwrap();
        assert_eq!(tags[0].end_span(), Some(TagSpan::new(40, 60, 63)));
        assert_eq!(tags[0].content(), Some(""));
    }

    #[test]
    fn test_content_keeps_whitespace() {
        let text = "some test text <!-- a_tag_name_START tag0property0='some value' -->some content<!-- a_tag_name_END -->  <!-- a_tag_name_START tag1Property0='another value' tag1Property1='yet another value' --> more content <!-- a_tag_name_END --> and some more text";
        let tags = extract_tags(text, NAME, true).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].start_span(), TagSpan::new(15, 37, 67));
        assert_eq!(tags[0].end_span(), Some(TagSpan::new(79, 99, 102)));
        assert_eq!(tags[0].content(), Some("some content"));
        assert_eq!(tags[1].start_span(), TagSpan::new(104, 126, 193));
        assert_eq!(tags[1].end_span(), Some(TagSpan::new(207, 227, 230)));
        assert_eq!(tags[1].content(), Some(" more content "));
    }

    #[test]
    fn test_missing_end_tag() {
        let text = "some test text <!-- a_tag_name_START -->some content<!-- a_tag_name_ZEND --> and some more text";
        let err = extract_tags(text, NAME, true).unwrap_err();
        assert!(matches!(err, InjectError::MissingEndTag { .. }));
        assert_eq!(err.span(), Some(&(15..40)));
    }

    #[test]
    fn test_nested_same_name_is_not_matched() {
        let text = "<!-- t_START -->a<!-- t_START -->b<!-- t_END -->c<!-- t_END -->";
        let tags = extract_tags(text, "t", true).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].content(), Some("a<!-- t_START -->b"));
    }

    #[test]
    fn test_offsets_are_bytes() {
        let text = "héllo <!-- a_tag_name k='ü' --> wörld";
        let tags = extract_tags(text, NAME, false).unwrap();
        let span = tags[0].start_span();
        assert_eq!(span.start, "héllo ".len());
        assert_eq!(&text[span.start..span.end], "<!-- a_tag_name k='ü' -->");
        assert_eq!(tags[0].property("k"), Some("ü"));
    }

    #[test]
    fn test_find_ignore_ascii_case() {
        assert_eq!(find_ignore_ascii_case("abcABC", "abc", 1), Some(3));
        assert_eq!(find_ignore_ascii_case("abc", "abcd", 0), None);
        assert_eq!(find_ignore_ascii_case("abc", "c", 4), None);
    }
}
