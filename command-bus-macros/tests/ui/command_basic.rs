use command_bus::Command;

#[derive(Command)]
struct Ping;

#[derive(Debug, Command)]
struct Rename {
    id: u32,
    name: String,
}

#[derive(Command)]
struct Tagged(&'static str);

#[derive(Command)]
enum Toggle {
    On,
    Off,
}

fn assert_command<C: Command>() {}

fn main() {
    assert_command::<Ping>();
    assert_command::<Rename>();
    assert_command::<Tagged>();
    assert_command::<Toggle>();

    // 派生后可作为 dyn Command 使用
    let boxed: Vec<Box<dyn Command>> = vec![
        Box::new(Ping),
        Box::new(Rename {
            id: 1,
            name: "a".into(),
        }),
        Box::new(Tagged("t")),
        Box::new(Toggle::On),
        Box::new(Toggle::Off),
    ];
    assert!((*boxed[1]).command_name().ends_with("Rename"));
}
