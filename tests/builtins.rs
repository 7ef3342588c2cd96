mod support;

use basalt::BasaltError;

#[test]
fn string_upper_lower_trim_mutate_in_place() {
    let src = r#"
let mut s = "  Hi There  "
string trim(s)
string upper(s)
printf("[s]")
"#;
    assert_eq!(support::run_ok_output(src), "HI THERE");
}

#[test]
fn string_replace_expands_escapes() {
    let src = r#"
let mut s = "a-b-c"
string replace(s, "-", " ")
printf("[s]")
"#;
    assert_eq!(support::run_ok_output(src), "a b c");
}

#[test]
fn list_add_len_get_pop_remove() {
    let src = r#"
let mut xs = [10 20 30]
list add(xs, 40)
list len(xs) -> n
list get(xs, 0) -> first
list pop(xs, 1) -> popped
list remove(xs, 0)
printf("[n] [first] [popped]")
"#;
    assert_eq!(support::run_ok_output(src), "4 10 20");
}

#[test]
fn list_index_out_of_range_is_an_error() {
    let (flow, _host) = support::run("let xs = [1 2]\nlist get(xs, 9) -> x\n");
    assert!(matches!(flow.unwrap_err(), BasaltError::IndexOutOfBounds { .. }));
}

#[test]
fn dict_literal_preserves_insertion_order_and_entry_count() {
    let src = r#"
let d = { "k": 1, "m": 2 }
dict get(d, "k") -> k
dict get(d, "m") -> m
printf("[k] [m]")
"#;
    assert_eq!(support::run_ok_output(src), "1 2");
}

#[test]
fn dict_set_and_delete() {
    let src = r#"
let mut d = { "x": 1 }
dict set(d, "y", 2)
dict delete(d, "x")
dict get(d, "y") -> y
printf("[y]")
"#;
    assert_eq!(support::run_ok_output(src), "2");
}

#[test]
fn ascii_char_and_char_ascii_round_trip() {
    let src = r#"
let mut code = 65
ascii_char(code)
printf("[code]")
char_ascii(code)
printf(" [code]")
"#;
    assert_eq!(support::run_ok_output(src), "A 65");
}

#[test]
fn int_float_str_coerce_in_place() {
    let src = r#"
let mut n = "42"
int(n)
printf("[n]")
"#;
    assert_eq!(support::run_ok_output(src), "42");
}

#[test]
fn split_on_explicit_separator() {
    let src = r#"
let mut s = "a,b,c"
split(s, ",")
list len(s) -> n
printf("[n]")
"#;
    assert_eq!(support::run_ok_output(src), "3");
}

#[test]
fn alpha_digit_alnum_classification() {
    let src = r#"
alpha("hello", a)
digit("123", d)
alnum("ab12", m)
printf("[a] [d] [m]")
"#;
    assert_eq!(support::run_ok_output(src), "1 1 1");
}
