//! Source locations attached to symbols.
//!
//! Stored in documents in a compact textual form: each frame is `file` or
//! `file*line`, and frames of an include chain are joined with `|`, innermost
//! first.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const LINE_SEPARATOR: char = '*';
const PARENT_SEPARATOR: char = '|';

/// A position in compiler input, with the chain of files that included it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
	pub file_name: String,
	pub line_number: Option<u32>,
	pub parent: Option<Box<SourceLocation>>,
}

impl SourceLocation {
	pub fn new(file_name: impl Into<String>, line_number: Option<u32>) -> Self {
		Self {
			file_name: file_name.into(),
			line_number,
			parent: None,
		}
	}

	/// Attaches the location that included this one.
	pub fn included_from(mut self, parent: SourceLocation) -> Self {
		self.parent = Some(Box::new(parent));
		self
	}

	/// Iterates this location and its ancestors, innermost first.
	pub fn frames(&self) -> impl Iterator<Item = &SourceLocation> {
		std::iter::successors(Some(self), |loc| loc.parent.as_deref())
	}
}

impl fmt::Display for SourceLocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, frame) in self.frames().enumerate() {
			if i > 0 {
				write!(f, "{PARENT_SEPARATOR}")?;
			}
			f.write_str(&frame.file_name)?;
			if let Some(line) = frame.line_number {
				write!(f, "{LINE_SEPARATOR}{line}")?;
			}
		}
		Ok(())
	}
}

/// Error parsing an encoded source location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid source location {0:?}")]
pub struct ParseSourceLocationError(pub String);

impl FromStr for SourceLocation {
	type Err = ParseSourceLocationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut frames = Vec::new();
		for frame in s.split(PARENT_SEPARATOR) {
			let (file, line) = match frame.rsplit_once(LINE_SEPARATOR) {
				Some((file, line)) => {
					let line = line.parse().map_err(|_| ParseSourceLocationError(s.to_owned()))?;
					(file, Some(line))
				}
				None => (frame, None),
			};
			if file.is_empty() {
				return Err(ParseSourceLocationError(s.to_owned()));
			}
			frames.push(SourceLocation::new(file, line));
		}

		// Rebuild the chain from the outermost frame inward.
		let mut location: Option<SourceLocation> = None;
		for mut frame in frames.into_iter().rev() {
			frame.parent = location.map(Box::new);
			location = Some(frame);
		}
		location.ok_or_else(|| ParseSourceLocationError(s.to_owned()))
	}
}

impl Serialize for SourceLocation {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for SourceLocation {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		raw.parse().map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::SourceLocation;

	#[test]
	fn test_encode_include_chain() {
		let loc = SourceLocation::new("inner.wxi", Some(12)).included_from(SourceLocation::new("main.wxs", Some(3)));
		assert_eq!(loc.to_string(), "inner.wxi*12|main.wxs*3");
		assert_eq!("inner.wxi*12|main.wxs*3".parse::<SourceLocation>().unwrap(), loc);
	}

	#[test]
	fn test_frame_without_line() {
		let loc: SourceLocation = "generated".parse().unwrap();
		assert_eq!(loc, SourceLocation::new("generated", None));
		assert_eq!(loc.frames().count(), 1);
	}

	#[test]
	fn test_rejects_bad_line_and_empty_file() {
		assert!("a.wxs*x".parse::<SourceLocation>().is_err());
		assert!("".parse::<SourceLocation>().is_err());
		assert!("a.wxs*1|".parse::<SourceLocation>().is_err());
	}
}
