/// Split an artisan command line on single spaces.
///
/// Consecutive spaces are not merged: `"a  b"` yields `["a", "", "b"]`, and
/// an empty line yields one empty argument.
pub fn split_command_line(line: &str) -> Vec<String> {
    line.split(' ').map(str::to_owned).collect()
}

/// Full argv for running `line` through `php artisan`.
pub fn artisan_args(line: &str) -> Vec<String> {
    let mut args = vec!["php".to_owned(), "artisan".to_owned()];
    args.extend(split_command_line(line));
    args
}
