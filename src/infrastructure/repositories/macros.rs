/// Appends `column = ?` to an `UPDATE ... SET` builder when `$value` is
/// `Some`, separating columns with commas. `$sep` tracks whether anything was
/// pushed yet. A `Some(None)` value binds `NULL`.
macro_rules! push_update_field {
    ($builder:expr, $sep:ident, $column:literal, $value:expr) => {
        if let Some(value) = $value {
            if $sep {
                $builder.push(", ");
            }
            $builder.push(concat!($column, " = "));
            $builder.push_bind(value);
            $sep = true;
        }
    };
}

pub(crate) use push_update_field;
