//! Formatting helpers.

use std::fmt;

struct DisplayFn<F>(F);

impl<F> fmt::Display for DisplayFn<F>
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

/// Create a value whose `Display` implementation is the specified closure.
pub fn display_fn<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    DisplayFn(f)
}

/// Join the `Debug` representations of the items with `", "`.
pub fn display_list<'a, T, I>(items: I) -> impl fmt::Display + 'a
where
    T: fmt::Debug + 'a,
    I: IntoIterator<Item = &'a T> + Clone + 'a,
{
    display_fn(move |f| {
        for (i, item) in items.clone().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", item)?;
        }
        Ok(())
    })
}
