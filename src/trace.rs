//! Append-only trace emission: one row per body per emitted step.

use std::io::{self, Write};

use crate::body::Body;

/// A sink bodies' per-step state is reported to. Implementations must
/// write a single header line before the first step's rows and nothing
/// else before it; step-major, body-minor row order.
pub trait TraceSink {
    fn emit(&mut self, step: u64, time: f64, bodies: &[Body]) -> io::Result<()>;
}

/// Discards every record. Useful when a caller only wants the final body
/// state and has no use for a trace.
#[derive(Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn emit(&mut self, _step: u64, _time: f64, _bodies: &[Body]) -> io::Result<()> {
        Ok(())
    }
}

/// Line-oriented tabular sink: header
/// `step,time,body,m,x,y,z,vx,vy,vz` followed by one row per body per
/// step, fixed precision (four decimal digits for scalars, two for
/// masses unless overridden).
pub struct CsvTraceSink<W: Write> {
    writer: W,
    header_written: bool,
    scalar_precision: usize,
    mass_precision: usize,
}

impl<W: Write> CsvTraceSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            scalar_precision: 4,
            mass_precision: 2,
        }
    }

    /// Overrides the default (4 scalar / 2 mass decimal digit) precision.
    pub fn with_precision(mut self, scalar_precision: usize, mass_precision: usize) -> Self {
        self.scalar_precision = scalar_precision;
        self.mass_precision = mass_precision;
        self
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.writer, "step,time,body,m,x,y,z,vx,vy,vz")
    }
}

impl<W: Write> TraceSink for CsvTraceSink<W> {
    fn emit(&mut self, step: u64, time: f64, bodies: &[Body]) -> io::Result<()> {
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }

        let sp = self.scalar_precision;
        let mp = self.mass_precision;

        for (id, body) in bodies.iter().enumerate() {
            writeln!(
                self.writer,
                "{step},{time:.sp$},{id},{m:.mp$},{x:.sp$},{y:.sp$},{z:.sp$},{vx:.sp$},{vy:.sp$},{vz:.sp$}",
                step = step,
                time = time,
                id = id,
                m = body.mass,
                x = body.position.x,
                y = body.position.y,
                z = body.position.z,
                vx = body.velocity.x,
                vy = body.velocity.y,
                vz = body.velocity.z,
                sp = sp,
                mp = mp,
            )?;
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    #[test]
    fn header_written_once() {
        let bodies = vec![Body::new(1., Vec3::new_zero(), Vec3::new_zero())];
        let mut buf = Vec::new();
        {
            let mut sink = CsvTraceSink::new(&mut buf);
            sink.emit(0, 0., &bodies).unwrap();
            sink.emit(1, 0.01, &bodies).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("step,time,body").count(), 1);
    }

    #[test]
    fn rows_are_step_major_body_minor() {
        let bodies = vec![
            Body::new(1., Vec3::new_zero(), Vec3::new_zero()),
            Body::new(2., Vec3::new(1., 0., 0.), Vec3::new_zero()),
        ];
        let mut buf = Vec::new();
        {
            let mut sink = CsvTraceSink::new(&mut buf);
            sink.emit(0, 0., &bodies).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 bodies
        assert!(lines[1].starts_with("0,0.0000,0,"));
        assert!(lines[2].starts_with("0,0.0000,1,"));
    }
}
