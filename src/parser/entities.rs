use std::borrow::Cow;

/// Decodes HTML character references left in already-extracted text.
///
/// Covers the full HTML5 named table plus decimal and hex references.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    html_escape::decode_html_entities(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(decode_entities("El Padrino"), Cow::Borrowed(_)));
    }

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("Schindler&#39;s List"), "Schindler's List");
        assert_eq!(decode_entities("L&#xE9;on"), "Léon");
        assert_eq!(decode_entities("&iquest;Qu&eacute; pasa?"), "¿Qué pasa?");
    }

    #[test]
    fn decodes_accents_beyond_spanish() {
        assert_eq!(decode_entities("Das Boot &ouml;"), "Das Boot ö");
        assert_eq!(decode_entities("Am&eacute;lie &agrave; Montmartre"), "Amélie à Montmartre");
        assert_eq!(decode_entities("La Cha&icirc;ne &egrave;re"), "La Chaîne ère");
        assert_eq!(decode_entities("Stra&szlig;e"), "Straße");
        assert_eq!(decode_entities("&Aring;ngstr&ouml;m &AElig;on"), "Ångström Æon");
    }

    #[test]
    fn bare_ampersand_is_kept() {
        assert_eq!(decode_entities("R&D"), "R&D");
    }
}
