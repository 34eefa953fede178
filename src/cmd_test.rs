use crate::cmd::{self, Command, Response, Table};
use crate::error::Error;
use crate::symtab::Color;

#[test]
fn test_parse() {
    assert_eq!("insert 5 50".parse::<Command>(), Ok(Command::Insert(5, 50)));
    assert_eq!("  delete   7 ".parse::<Command>(), Ok(Command::Delete(7)));
    assert_eq!("search -3".parse::<Command>(), Ok(Command::Search(-3)));
    assert_eq!("getval 0".parse::<Command>(), Ok(Command::GetVal(0)));
    assert_eq!("rank 4".parse::<Command>(), Ok(Command::Rank(4)));
    assert_eq!(
        "getelement 1 3".parse::<Command>(),
        Ok(Command::GetElement(1, 3))
    );

    let cmd = Command::GetElement(2, 9);
    assert_eq!(cmd.to_string().parse::<Command>(), Ok(cmd));
}

#[test]
fn test_parse_error() {
    let lines = ["insert 5", "delete", "search x", "rank 1 2", "getval 1.5", "", "bogus 1"];
    for line in lines.iter() {
        match line.parse::<Command>() {
            Err(Error::InvalidArgument(_)) => (),
            res => panic!("{:?} unexpected {:?}", line, res),
        }
    }
}

#[test]
fn test_apply() {
    let mut table = Table::new();

    let resp = Command::Delete(1).apply(&mut table);
    let refresp = Response::Tree {
        dump: vec![],
        error: Some(Error::NotFound),
    };
    assert_eq!(resp, refresp);
    assert_eq!(Command::Rank(1).apply(&mut table).to_string(), "-1\n");

    Command::Insert(10, 100).apply(&mut table);
    Command::Insert(20, 200).apply(&mut table);
    let resp = Command::Insert(30, 300).apply(&mut table);
    let dump = vec![(10, Color::Black), (20, Color::Black), (30, Color::Black)];
    assert_eq!(resp, Response::Tree { dump, error: None });

    assert_eq!(
        Command::Search(20).apply(&mut table),
        Response::Value(Some(200))
    );
    assert_eq!(Command::GetVal(2).apply(&mut table), Response::Key(Ok(30)));
    assert_eq!(
        Command::GetVal(-1).apply(&mut table),
        Response::Key(Err(Error::OutOfRange { rank: -1, size: 3 }))
    );
    assert_eq!(
        Command::GetVal(3).apply(&mut table),
        Response::Key(Err(Error::OutOfRange { rank: 3, size: 3 }))
    );
    assert_eq!(Command::Rank(25).apply(&mut table), Response::Rank(Some(2)));
    assert_eq!(
        Command::GetElement(-1, 2).apply(&mut table),
        Response::Keys(vec![])
    );
    assert_eq!(
        Command::GetElement(1, 2).apply(&mut table),
        Response::Keys(vec![20, 30])
    );
}

#[test]
fn test_replay() {
    let fixture = "\
insert 5 50
insert 3 30
search 3
search 9
rank 4
getval 0
getval 7
getelement 0 1
getelement 1 0
delete 9
bogus 1
# comment

delete 5
";
    let transcript = "\
insert 5 50
Color: Black; Key: 5

insert 3 30
Color: Red; Key: 3
Color: Black; Key: 5

search 3
30

search 9
null

rank 4
1

getval 0
3

getval 7
null

getelement 0 1
3
5

getelement 1 0

delete 9
key not found
Color: Red; Key: 3
Color: Black; Key: 5

bogus 1
invalid argument: invalid instruction \"bogus\"

delete 5
Color: Black; Key: 3

";

    let mut table = Table::new();
    let mut output: Vec<u8> = vec![];
    let n_cmds = cmd::replay(&mut table, fixture.as_bytes(), &mut output).unwrap();

    assert_eq!(n_cmds, 11);
    assert_eq!(String::from_utf8(output).unwrap(), transcript);
    assert_eq!(table.len(), 1);
    assert!(table.validate().is_ok());
}

#[test]
fn test_replay_fixture() {
    let fixture = include_str!("../fixtures/test_all.txt");
    let mut table = Table::new();
    let mut output: Vec<u8> = vec![];
    cmd::replay(&mut table, fixture.as_bytes(), &mut output).unwrap();

    assert!(table.validate().is_ok());
    assert_eq!(cmd::dump(&table).len(), table.len());
}
