use command_bus::{Command, TypedCommand};
use std::marker::PhantomData;

#[derive(Command)]
#[command(result = i32)]
struct Add {
    a: i32,
    b: i32,
}

#[derive(Command)]
#[command(result = Vec<String>)]
struct ListNames;

// 泛型命令：约束由使用方负责
#[derive(Command)]
#[command(result = Option<T>)]
struct Fetch<T: Send + Sync + 'static> {
    _marker: PhantomData<T>,
}

fn assert_typed<C: TypedCommand<R>, R: Send + 'static>() {}

fn main() {
    assert_typed::<Add, i32>();
    assert_typed::<ListNames, Vec<String>>();
    assert_typed::<Fetch<u8>, Option<u8>>();

    let add: Box<dyn TypedCommand<i32>> = Box::new(Add { a: 1, b: 2 });
    assert!((*add).command_name().ends_with("Add"));
}
