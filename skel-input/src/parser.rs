use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace1},
    combinator::{map, map_res, opt, value},
    multi::{many0, many1, separated_list0},
    sequence::{pair, preceded, separated_pair, terminated, tuple},
    IResult,
};
use skel_automaton::{TagCommand, TagVersion};

pub(crate) struct RawTransition<'src> {
    pub at: &'src [u8],
    pub classes: (usize, usize),
    pub target: Option<usize>,
    pub cmd: TagCommand,
}

pub(crate) struct RawState<'src> {
    pub at: &'src [u8],
    pub index: usize,
    pub accept: Option<(&'src [u8], TagCommand)>,
    pub transitions: Vec<RawTransition<'src>>,
}

pub(crate) enum Item<'src> {
    Charset { at: &'src [u8], bounds: Vec<u32> },
    Rule { name: &'src [u8] },
    Tag { name: &'src [u8] },
    Default { name: &'src [u8] },
    State(RawState<'src>),
}

enum Op {
    Save(TagVersion),
    Bottom(TagVersion),
    Copy(TagVersion, TagVersion),
}

fn parse_comment(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag("#"), take_while(|c: u8| c != b'\n'))(input)
}

fn ws(input: &[u8]) -> IResult<&[u8], ()> {
    value((), many0(alt((multispace1, parse_comment))))(input)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], &'a [u8]> {
    terminated(tag(kw), multispace1)
}

fn parse_u32(input: &[u8]) -> IResult<&[u8], u32> {
    map_res(digit1, |digits: &[u8]| {
        std::str::from_utf8(digits).unwrap_or_default().parse::<u32>()
    })(input)
}

fn parse_usize(input: &[u8]) -> IResult<&[u8], usize> {
    map_res(digit1, |digits: &[u8]| {
        std::str::from_utf8(digits).unwrap_or_default().parse::<usize>()
    })(input)
}

fn parse_name(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|c: u8| c.is_ascii_alphanumeric() || c == b'_')(input)
}

fn parse_op(input: &[u8]) -> IResult<&[u8], Op> {
    alt((
        map(preceded(keyword("save"), parse_u32), Op::Save),
        map(preceded(keyword("bottom"), parse_u32), Op::Bottom),
        map(
            preceded(
                keyword("copy"),
                separated_pair(parse_u32, tuple((ws, char('='), ws)), parse_u32),
            ),
            |(lhs, rhs)| Op::Copy(lhs, rhs),
        ),
    ))(input)
}

fn parse_command(input: &[u8]) -> IResult<&[u8], TagCommand> {
    let (input, _) = pair(char('{'), ws)(input)?;
    let (input, ops) = separated_list0(tuple((ws, char(','), ws)), parse_op)(input)?;
    let (input, _) = pair(ws, char('}'))(input)?;
    let cmd = ops.into_iter().fold(TagCommand::new(), |cmd, op| match op {
        Op::Save(version) => cmd.save(version),
        Op::Bottom(version) => cmd.save_bottom(version),
        Op::Copy(lhs, rhs) => cmd.copy(lhs, rhs),
    });
    Ok((input, cmd))
}

fn parse_transition(input: &[u8]) -> IResult<&[u8], RawTransition> {
    let at = input;
    let (input, first) = parse_usize(input)?;
    let (input, last) = opt(preceded(tag(".."), parse_usize))(input)?;
    let (input, _) = tuple((ws, tag("->"), ws))(input)?;
    let (input, target) = alt((value(None, tag("none")), map(parse_usize, Some)))(input)?;
    let (input, cmd) = opt(preceded(ws, parse_command))(input)?;
    Ok((
        input,
        RawTransition {
            at,
            classes: (first, last.unwrap_or(first)),
            target,
            cmd: cmd.unwrap_or_default(),
        },
    ))
}

fn parse_accept(input: &[u8]) -> IResult<&[u8], (&[u8], TagCommand)> {
    let (input, _) = pair(ws, keyword("accept"))(input)?;
    let (input, name) = parse_name(input)?;
    let (input, cmd) = opt(preceded(ws, parse_command))(input)?;
    Ok((input, (name, cmd.unwrap_or_default())))
}

fn parse_state(input: &[u8]) -> IResult<&[u8], RawState> {
    let (input, _) = keyword("state")(input)?;
    let at = input;
    let (input, index) = parse_usize(input)?;
    let (input, accept) = opt(parse_accept)(input)?;
    let (input, transitions) = many0(preceded(ws, parse_transition))(input)?;
    Ok((
        input,
        RawState {
            at,
            index,
            accept,
            transitions,
        },
    ))
}

fn parse_charset(input: &[u8]) -> IResult<&[u8], Item> {
    let at = input;
    let (input, _) = tag("charset")(input)?;
    let (input, bounds) = many1(preceded(ws, parse_u32))(input)?;
    Ok((input, Item::Charset { at, bounds }))
}

fn parse_item(input: &[u8]) -> IResult<&[u8], Item> {
    alt((
        parse_charset,
        map(preceded(keyword("rule"), parse_name), |name| Item::Rule {
            name,
        }),
        map(preceded(keyword("tag"), parse_name), |name| Item::Tag {
            name,
        }),
        map(preceded(keyword("default"), parse_name), |name| {
            Item::Default { name }
        }),
        map(parse_state, Item::State),
    ))(input)
}

/// Parses the whole description. On failure returns the input that could
/// not be parsed.
pub(crate) fn parse_items(input: &[u8]) -> Result<Vec<Item>, &[u8]> {
    let parsed = terminated(many0(preceded(ws, parse_item)), ws)(input);
    match parsed {
        Ok((rest, items)) if rest.is_empty() => Ok(items),
        Ok((rest, _)) => Err(rest),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.input),
        Err(nom::Err::Incomplete(_)) => Err(&input[input.len()..]),
    }
}

pub(crate) fn first_word(input: &[u8]) -> String {
    let word: Vec<u8> = input
        .iter()
        .copied()
        .take_while(|c| !c.is_ascii_whitespace())
        .take(20)
        .collect();
    if word.is_empty() {
        "end of input".to_string()
    } else {
        String::from_utf8_lossy(&word).to_string()
    }
}
