use crate::errors::ApiError;

/// Replace the numbered placeholders `{0}`, `{1}`, ... in `base` with `args`.
///
/// Every placeholder in `base` is replaced, so the same index may appear more
/// than once.
///
/// # Errors
///
/// An internal error when `base` has no placeholder for one of the args.
pub fn inject_string<S: AsRef<str>>(base: &str, args: &[S]) -> Result<String, ApiError> {
    let mut text = base.to_string();
    for (i, arg) in args.iter().enumerate() {
        let placeholder = format!("{{{i}}}");
        if !text.contains(&placeholder) {
            return Err(ApiError::internal(format!(
                "Place holder is missing with number: {i}"
            )));
        }
        text = text.replace(&placeholder, arg.as_ref());
    }
    Ok(text)
}

/// Description of the first error, `None` when there are no errors.
pub fn first_error_message<T, I, F>(errors: I, to_string: F) -> Option<String>
where
    I: IntoIterator<Item = T>,
    F: FnOnce(T) -> String,
{
    errors.into_iter().next().map(to_string)
}
