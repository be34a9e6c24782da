use nalgebra as na;
use planer::PointInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
	/// Json if the input starts with '[', text otherwise
	Auto,
	/// Array of `[x, y, z]` or `{"x": .., "y": .., "z": ..}`
	Json,
	/// One point per line, separated by whitespace or commas
	Text,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Invalid json: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Line {line}: expected 3 coordinates, found {found}")]
	Coordinates { line: usize, found: usize },

	#[error("Line {line}: invalid number '{value}'")]
	Number { line: usize, value: String },
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum JsonPoint {
	Triple([f64; 3]),
	Named { x: f64, y: f64, z: f64 },
}

impl From<JsonPoint> for PointInput {
	fn from(value: JsonPoint) -> Self {
		match value {
			JsonPoint::Triple(triple) => Self::Triple(triple),
			JsonPoint::Named { x, y, z } => Self::Point(na::Point3::new(x, y, z)),
		}
	}
}

pub fn parse(source: &str, format: Format) -> Result<Vec<PointInput>, Error> {
	let format = match format {
		Format::Auto if source.trim_start().starts_with('[') => Format::Json,
		Format::Auto => Format::Text,
		format => format,
	};
	log::debug!("parsing input as {:?}", format);
	match format {
		Format::Json => parse_json(source),
		Format::Auto | Format::Text => parse_text(source),
	}
}

fn parse_json(source: &str) -> Result<Vec<PointInput>, Error> {
	let points = serde_json::from_str::<Vec<JsonPoint>>(source)?;
	Ok(points.into_iter().map(PointInput::from).collect())
}

fn parse_text(source: &str) -> Result<Vec<PointInput>, Error> {
	let mut points = Vec::new();
	for (index, line) in source.lines().enumerate() {
		let line = line.split('#').next().unwrap_or_default();
		let values = line
			.split(|c: char| c == ',' || c.is_whitespace())
			.filter(|value| !value.is_empty())
			.map(|value| {
				value
					.parse::<f64>()
					.map_err(|_| Error::Number { line: index + 1, value: value.into() })
			})
			.collect::<Result<Vec<_>, _>>()?;
		match values[..] {
			[] => {},
			[x, y, z] => points.push(PointInput::Triple([x, y, z])),
			_ => return Err(Error::Coordinates { line: index + 1, found: values.len() }),
		}
	}
	Ok(points)
}
