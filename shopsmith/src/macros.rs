/// Creates a single text [`Turn`](crate::Turn) from a role shorthand.
///
/// ```rust
/// use shopsmith::{Role, ss_turn};
///
/// let turn = ss_turn!(assistant => "Done.");
/// assert_eq!(turn.role, Role::Assistant);
/// assert_eq!(turn.text(), "Done.");
/// ```
#[macro_export]
macro_rules! ss_turn {
    (user => $content:expr $(,)?) => {
        $crate::Turn::user_text($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Turn::assistant_text($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use user or assistant");
    };
}

/// Creates a `Vec<Turn>` from role/content pairs.
///
/// ```rust
/// use shopsmith::{Role, ss_history};
///
/// let history = ss_history![
///     user => "Do you carry boots?",
///     assistant => "We do.",
/// ];
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[0].role, Role::User);
/// assert_eq!(history[1].role, Role::Assistant);
/// ```
#[macro_export]
macro_rules! ss_history {
    () => {
        Vec::<$crate::Turn>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::ss_turn!($role => $content)),+]
    };
}
