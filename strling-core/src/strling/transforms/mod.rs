//! Composable compilation pipeline
//!
//! Each pipeline step is a stage implementing [`Runnable`]. Stages are chained
//! into a [`Transform`] with `.then()`, and the compiler checks at every link
//! that one stage's output type is the next stage's input type:
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(Ok)
//!     .then(Parsing::new())       // String   -> Parsed
//!     .then(Lowering::new())      // Parsed   -> Compiled
//!     .then(Normalizing::new())   // Compiled -> Compiled
//!     .then(Pcre2Emission::new()); // Compiled -> String
//! ```
//!
//! The standard pipelines are prebuilt statics in [`standard`].
//!
//! Every stage fails with [`ParseError`]. Only parsing can fail today; later
//! stages are infallible but keep the same signature so custom stages can be
//! slotted in.

pub mod stages;
pub mod standard;

use crate::strling::error::ParseError;

/// A single transformation step.
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, ParseError>;
}

/// A chain of stages from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, ParseError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, ParseError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Feed this transform's output into `stage`.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Chain a prebuilt static transform.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, ParseError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, ParseError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;
    impl Runnable<i32, i32> for Double {
        fn run(&self, input: i32) -> Result<i32, ParseError> {
            Ok(input * 2)
        }
    }

    struct Render;
    impl Runnable<i32, String> for Render {
        fn run(&self, input: i32) -> Result<String, ParseError> {
            Ok(input.to_string())
        }
    }

    struct Reject;
    impl Runnable<i32, i32> for Reject {
        fn run(&self, input: i32) -> Result<i32, ParseError> {
            Err(ParseError::new("rejected", input as usize))
        }
    }

    #[test]
    fn test_chained_stages() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(Double)
            .then(Double)
            .then(Render);
        assert_eq!(transform.run(3).unwrap(), "12");
    }

    #[test]
    fn test_error_short_circuits() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(Reject)
            .then(Render);
        let err = transform.run(4).unwrap_err();
        assert_eq!(err.message, "rejected");
        assert_eq!(err.pos, 4);
    }
}
