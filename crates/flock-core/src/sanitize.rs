//! Content sanitization: threat detection and HTML-entity encoding.
//!
//! `validate` is the authoritative server-side entry point for any
//! user-supplied text headed for storage. It enforces a per-field length
//! cap, scans for a fixed set of threat signatures, and on the clean path
//! applies encode-then-strip: entity-encode the HTML-reserved characters
//! first, then strip control and zero-width characters. The ordering
//! matters - encoding first prevents entity fragments and raw control
//! characters from recombining into a renderable tag once the controls
//! are gone.

use regex::Regex;
use std::sync::OnceLock;

use crate::prelude::*;

/// Field categories with distinct length caps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
	Title,
	Comment,
	Body,
}

impl FieldKind {
	pub fn max_len(self) -> usize {
		match self {
			FieldKind::Title => 100,
			FieldKind::Comment => 500,
			FieldKind::Body => 2000,
		}
	}
}

/// Signature classes the threat scan recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreatClass {
	/// script/iframe/object/embed/form/input/meta/link/style/base tags
	DangerousTag,
	/// data:...;base64, payloads
	Base64Payload,
	/// javascript:/vbscript:/data:/mocha: URI schemes
	UriScheme,
	/// on<word>= event-handler attributes
	EventHandler,
	/// eval(/Function(/setTimeout(/setInterval(/expression( calls
	ScriptCall,
	/// Numeric/hex entities, percent-encoding, \u and \x escapes
	EncodedPayload,
	/// <!ENTITY>, <!DOCTYPE>, <![CDATA[ declarations
	XmlDeclaration,
	/// Raw C0/C1 control or zero-width/BOM characters
	ControlCharacter,
}

impl ThreatClass {
	pub fn as_str(self) -> &'static str {
		match self {
			ThreatClass::DangerousTag => "dangerous_tag",
			ThreatClass::Base64Payload => "base64_payload",
			ThreatClass::UriScheme => "uri_scheme",
			ThreatClass::EventHandler => "event_handler",
			ThreatClass::ScriptCall => "script_call",
			ThreatClass::EncodedPayload => "encoded_payload",
			ThreatClass::XmlDeclaration => "xml_declaration",
			ThreatClass::ControlCharacter => "control_character",
		}
	}
}

/// A matched threat signature.
#[derive(Clone, Debug)]
pub struct ThreatMatch {
	pub class: ThreatClass,
	/// The matched fragment (bounded; safe to log)
	pub fragment: Box<str>,
}

/// Rejection outcomes of `validate`.
#[derive(Clone, Debug)]
pub enum SanitizeRejection {
	TooLong { max: usize, actual: usize },
	ThreatDetected(ThreatMatch),
	/// Scanner failure; treated as denial (fail-closed)
	Internal(String),
}

impl From<SanitizeRejection> for Error {
	fn from(rejection: SanitizeRejection) -> Self {
		match rejection {
			SanitizeRejection::TooLong { max, actual } => {
				Error::InvalidArgument(format!("text too long: {} > {} characters", actual, max))
			}
			SanitizeRejection::ThreatDetected(_) => Error::PermissionDenied,
			SanitizeRejection::Internal(msg) => Error::Internal(msg),
		}
	}
}

/// Maximum fragment length captured into a `ThreatMatch`.
const FRAGMENT_CAP: usize = 64;

static THREAT_PATTERNS: OnceLock<Result<Vec<(ThreatClass, Regex)>, regex::Error>> = OnceLock::new();

fn build_threat_patterns() -> Result<Vec<(ThreatClass, Regex)>, regex::Error> {
	// Base64Payload precedes UriScheme so data:...;base64 payloads report
	// the more specific class.
	Ok(vec![
		(
			ThreatClass::DangerousTag,
			Regex::new(r"(?i)<\s*(script|iframe|object|embed|form|input|meta|link|style|base)\b")?,
		),
		(ThreatClass::Base64Payload, Regex::new(r"(?i)data\s*:[^,]{0,128};\s*base64\s*,")?),
		(ThreatClass::UriScheme, Regex::new(r"(?i)\b(javascript|vbscript|data|mocha)\s*:")?),
		(ThreatClass::EventHandler, Regex::new(r"(?i)\bon[a-z]+\s*=")?),
		(
			ThreatClass::ScriptCall,
			Regex::new(r"(?i)\b(eval|function|settimeout|setinterval|expression)\s*\(")?,
		),
		(
			ThreatClass::EncodedPayload,
			Regex::new(r"(?i)&#x?[0-9a-f]+;?|%[0-9a-f]{2}|\\u\{?[0-9a-f]{4}|\\x[0-9a-f]{2}")?,
		),
		(ThreatClass::XmlDeclaration, Regex::new(r"(?i)<!\s*(entity|doctype)|<!\[cdata\[")?),
	])
}

fn threat_patterns() -> Result<&'static [(ThreatClass, Regex)], SanitizeRejection> {
	match THREAT_PATTERNS.get_or_init(build_threat_patterns) {
		Ok(patterns) => Ok(patterns),
		Err(e) => Err(SanitizeRejection::Internal(format!("threat pattern compile error: {}", e))),
	}
}

fn is_zero_width(c: char) -> bool {
	matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

/// Raw control characters are threats except the whitespace controls the
/// encoder handles (\n, \r, \t).
fn is_raw_control(c: char) -> bool {
	(c.is_control() && !matches!(c, '\n' | '\r' | '\t')) || is_zero_width(c)
}

fn cap_fragment(fragment: &str) -> Box<str> {
	if fragment.len() <= FRAGMENT_CAP {
		Box::from(fragment)
	} else {
		let mut end = FRAGMENT_CAP;
		while !fragment.is_char_boundary(end) {
			end -= 1;
		}
		Box::from(&fragment[..end])
	}
}

/// Scan for threat signatures. Returns the first match, if any.
pub fn scan_threats(text: &str) -> Result<Option<ThreatMatch>, SanitizeRejection> {
	for (class, pattern) in threat_patterns()? {
		if let Some(found) = pattern.find(text) {
			return Ok(Some(ThreatMatch { class: *class, fragment: cap_fragment(found.as_str()) }));
		}
	}

	if let Some(c) = text.chars().find(|&c| is_raw_control(c)) {
		return Ok(Some(ThreatMatch {
			class: ThreatClass::ControlCharacter,
			fragment: format!("U+{:04X}", c as u32).into(),
		}));
	}

	Ok(None)
}

/// Fast boolean predicate for call sites that only need a reject decision
/// (identifiers, usernames). Scanner failure counts as dangerous.
pub fn looks_dangerous(text: &str) -> bool {
	match scan_threats(text) {
		Ok(found) => found.is_some(),
		Err(_) => true,
	}
}

/// Entities the encoder emits; an ampersand already starting one of these
/// is left alone so encoding is idempotent.
const OWN_ENTITIES: &[&str] = &["amp;", "lt;", "gt;", "quot;", "#39;", "#9;", "#10;", "#13;"];

fn encode_entities(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for (idx, c) in text.char_indices() {
		match c {
			'&' => {
				let tail = &text[idx + 1..];
				if OWN_ENTITIES.iter().any(|e| tail.starts_with(e)) {
					out.push('&');
				} else {
					out.push_str("&amp;");
				}
			}
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			'\t' => out.push_str("&#9;"),
			'\n' => out.push_str("&#10;"),
			'\r' => out.push_str("&#13;"),
			_ => out.push(c),
		}
	}

	out
}

fn strip_invisible(text: &str) -> String {
	text.chars().filter(|&c| !(c.is_control() || is_zero_width(c))).collect()
}

/// Encode-then-strip. Idempotent: sanitizing already-sanitized text is a
/// no-op.
pub fn sanitize(text: &str) -> String {
	strip_invisible(&encode_entities(text))
}

/// Validate and sanitize user-supplied text for storage.
///
/// Length is checked before pattern scanning (cheap check first). A threat
/// match is returned to the caller, which must record a security event -
/// detected threats are never swallowed silently.
pub fn validate(text: &str, kind: FieldKind) -> Result<String, SanitizeRejection> {
	let max = kind.max_len();
	let actual = text.chars().count();
	if actual > max {
		return Err(SanitizeRejection::TooLong { max, actual });
	}

	if let Some(threat) = scan_threats(text)? {
		return Err(SanitizeRejection::ThreatDetected(threat));
	}

	Ok(sanitize(text))
}

/// Cleanup for non-HTML identifier fields: trim, collapse internal
/// whitespace, drop control and zero-width characters.
pub fn sanitize_input(text: &str) -> String {
	let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
	collapsed.chars().filter(|&c| !(c.is_control() || is_zero_width(c))).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_threat(text: &str, class: ThreatClass) {
		match scan_threats(text) {
			Ok(Some(threat)) => assert_eq!(threat.class, class, "input: {}", text),
			other => panic!("expected {:?} for {:?}, got {:?}", class, text, other),
		}
	}

	#[test]
	fn test_dangerous_tags() {
		assert_threat("<script>alert(1)</script>", ThreatClass::DangerousTag);
		assert_threat("< IFRAME src=x>", ThreatClass::DangerousTag);
		assert_threat("hello <style>body{}</style>", ThreatClass::DangerousTag);
		assert_threat("<base href=evil>", ThreatClass::DangerousTag);
	}

	#[test]
	fn test_uri_schemes() {
		assert_threat("javascript:alert(1)", ThreatClass::UriScheme);
		assert_threat("click JAVASCRIPT : alert(1)", ThreatClass::UriScheme);
		assert_threat("vbscript:msgbox", ThreatClass::UriScheme);
	}

	#[test]
	fn test_base64_payload_reported_specifically() {
		assert_threat("data:text/html;base64,PHNjcmlwdD4=", ThreatClass::Base64Payload);
	}

	#[test]
	fn test_event_handlers() {
		assert_threat("onclick=alert(1)", ThreatClass::EventHandler);
		assert_threat("x ONLOAD = run()", ThreatClass::EventHandler);
	}

	#[test]
	fn test_script_calls() {
		assert_threat("eval(document.cookie)", ThreatClass::ScriptCall);
		assert_threat("setTimeout (x)", ThreatClass::ScriptCall);
	}

	#[test]
	fn test_encoded_payloads() {
		assert_threat("%3Cscript%3E", ThreatClass::EncodedPayload);
		assert_threat("&#x3c;script&#x3e;", ThreatClass::EncodedPayload);
		assert_threat("\\u003cscript", ThreatClass::EncodedPayload);
		assert_threat("\\x3cscript", ThreatClass::EncodedPayload);
	}

	#[test]
	fn test_xml_declarations() {
		assert_threat("<!ENTITY xxe SYSTEM 'file:///etc/passwd'>", ThreatClass::XmlDeclaration);
		assert_threat("<!DOCTYPE html>", ThreatClass::XmlDeclaration);
		assert_threat("<![CDATA[evil]]>", ThreatClass::XmlDeclaration);
	}

	#[test]
	fn test_control_characters() {
		assert_threat("abc\u{0000}def", ThreatClass::ControlCharacter);
		assert_threat("abc\u{200B}def", ThreatClass::ControlCharacter);
		assert_threat("\u{FEFF}bom", ThreatClass::ControlCharacter);
	}

	#[test]
	fn test_clean_text_passes() {
		assert!(scan_threats("Nice post!").unwrap().is_none());
		assert!(scan_threats("Tabs\tand\nnewlines are fine").unwrap().is_none());
		assert!(!looks_dangerous("just a normal comment"));
	}

	#[test]
	fn test_validate_too_long_before_patterns() {
		let long = "<script>".repeat(400);
		match validate(&long, FieldKind::Body) {
			Err(SanitizeRejection::TooLong { max: 2000, .. }) => {}
			other => panic!("expected TooLong, got {:?}", other),
		}
	}

	#[test]
	fn test_validate_threat() {
		match validate("<script>alert(1)</script>", FieldKind::Comment) {
			Err(SanitizeRejection::ThreatDetected(threat)) => {
				assert_eq!(threat.class, ThreatClass::DangerousTag);
			}
			other => panic!("expected ThreatDetected, got {:?}", other),
		}
	}

	#[test]
	fn test_sanitize_encodes_reserved() {
		assert_eq!(sanitize("a & b"), "a &amp; b");
		assert_eq!(sanitize("5 'quotes' \"here\""), "5 &#39;quotes&#39; &quot;here&quot;");
		assert_eq!(sanitize("line1\nline2"), "line1&#10;line2");
	}

	#[test]
	fn test_sanitize_strips_invisible() {
		assert_eq!(sanitize("a\u{200B}b"), "ab");
		assert_eq!(sanitize("a\u{0007}b"), "ab");
	}

	#[test]
	fn test_sanitize_idempotent() {
		let inputs =
			["plain text", "a & b < c", "it's \"fine\"\n", "mixed & already &amp; encoded"];
		for input in inputs {
			let once = sanitize(input);
			let twice = sanitize(&once);
			assert_eq!(once, twice, "input: {:?}", input);
		}
	}

	#[test]
	fn test_sanitize_input_collapses_whitespace() {
		assert_eq!(sanitize_input("  alice   smith \t"), "alice smith");
		assert_eq!(sanitize_input("a\u{200B}lice"), "alice");
	}
}

// vim: ts=4
