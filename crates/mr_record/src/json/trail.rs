use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Trail

#[derive(Debug, Clone, Copy)]
pub(super) enum Segment<'a> {
    Record(&'a str),
    Field(&'a str),
    Index(usize),
}

/// The position inside the record tree currently being processed.
///
/// Displayed as `Person.cars[2].brand` for diagnostics. With the `debug`
/// feature in debug builds, the ids of every record entered are appended.
#[derive(Debug, Default)]
pub(super) struct Trail<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Trail<'a> {
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Runs `f` with `segment` pushed onto the trail.
    pub fn scoped<R>(&mut self, segment: Segment<'a>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.segments.push(segment);
        let result = f(self);
        self.segments.pop();
        result
    }
}

fn short_name(id: &str) -> &str {
    id.rsplit("::").next().unwrap_or(id)
}

impl fmt::Display for Trail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(Segment::Record(id)) = segments.next() {
            f.write_str(short_name(id))?;
        }
        for segment in segments {
            match segment {
                Segment::Record(_) => {}
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }

        #[cfg(all(feature = "debug", debug_assertions))]
        {
            let mut records = self.segments.iter().filter_map(|segment| match segment {
                Segment::Record(id) => Some(*id),
                _ => None,
            });
            if let Some(first) = records.next() {
                write!(f, " (records: `{first}`")?;
                for id in records {
                    write!(f, " -> `{id}`")?;
                }
                f.write_str(")")?;
            }
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Segment, Trail};
    use alloc::string::ToString;

    #[test]
    fn display_path() {
        let mut trail = Trail::new();
        let text = trail.scoped(Segment::Record("app::Person"), |trail| {
            trail.scoped(Segment::Field("cars"), |trail| {
                trail.scoped(Segment::Index(2), |trail| {
                    trail.scoped(Segment::Record("app::Car"), |trail| {
                        trail.scoped(Segment::Field("brand"), |trail| trail.to_string())
                    })
                })
            })
        });

        assert!(text.starts_with("Person.cars[2].brand"));
        #[cfg(all(feature = "debug", debug_assertions))]
        assert!(text.ends_with("(records: `app::Person` -> `app::Car`)"));

        assert_eq!(trail.to_string(), "");
    }
}
