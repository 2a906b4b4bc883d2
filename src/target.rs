use crate::Row;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;

pub trait Target {
	/// Useful for initializations
	fn write_headers(&mut self, columns: &[String]) -> Result<(), csv::Error>;
	fn write_row(&mut self, row: &Row) -> Result<(), csv::Error>;
	fn flush(&mut self) -> Result<(), csv::Error>;
}

fn not_started() -> csv::Error {
	csv::Error::from(io::Error::new(
		io::ErrorKind::Other,
		"Row written before headers",
	))
}

pub struct PathTarget {
	path: PathBuf,
	writer: Option<csv::Writer<File>>,
}
impl PathTarget {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self {
			path: path.into(),
			writer: None,
		}
	}
}
impl Target for PathTarget {
	fn write_headers(&mut self, columns: &[String]) -> Result<(), csv::Error> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}

		self.writer = Some(csv::Writer::from_path(&self.path)?);
		self.write_row(&Row::from(columns.to_vec()))
	}
	fn write_row(&mut self, row: &Row) -> Result<(), csv::Error> {
		self.writer.as_mut().ok_or_else(not_started)?.write_record(row)?;
		Ok(())
	}
	fn flush(&mut self) -> Result<(), csv::Error> {
		self.writer.as_mut().ok_or_else(not_started)?.flush()?;
		Ok(())
	}
}

pub struct StdoutTarget {
	writer: Option<csv::Writer<io::Stdout>>,
}
impl StdoutTarget {
	pub fn new() -> Self {
		Self { writer: None }
	}
}
impl Default for StdoutTarget {
	fn default() -> Self {
		Self::new()
	}
}
impl Target for StdoutTarget {
	fn write_headers(&mut self, columns: &[String]) -> Result<(), csv::Error> {
		let writer = WriterBuilder::new().from_writer(io::stdout());
		self.writer = Some(writer);
		self.write_row(&Row::from(columns.to_vec()))
	}
	fn write_row(&mut self, row: &Row) -> Result<(), csv::Error> {
		self.writer.as_mut().ok_or_else(not_started)?.write_record(row)?;
		Ok(())
	}
	fn flush(&mut self) -> Result<(), csv::Error> {
		self.writer.as_mut().ok_or_else(not_started)?.flush()?;
		Ok(())
	}
}

/// Appends the written table to a string on every flush
pub struct StringTarget<'a> {
	s: &'a mut String,
	writer: Option<csv::Writer<Vec<u8>>>,
}
impl<'a> StringTarget<'a> {
	pub fn new(s: &'a mut String) -> Self {
		Self {
			s,
			writer: Some(buffer_writer()),
		}
	}
}
fn buffer_writer() -> csv::Writer<Vec<u8>> {
	WriterBuilder::new().from_writer(Vec::new())
}
impl<'a> Target for StringTarget<'a> {
	fn write_headers(&mut self, columns: &[String]) -> Result<(), csv::Error> {
		self.write_row(&Row::from(columns.to_vec()))
	}
	fn write_row(&mut self, row: &Row) -> Result<(), csv::Error> {
		self.writer.as_mut().ok_or_else(not_started)?.write_record(row)?;
		Ok(())
	}
	fn flush(&mut self) -> Result<(), csv::Error> {
		let writer = self.writer.take().ok_or_else(not_started)?;
		let buffer = writer
			.into_inner()
			.map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
		self.s.push_str(&String::from_utf8_lossy(&buffer));
		self.writer = Some(buffer_writer());
		Ok(())
	}
}
