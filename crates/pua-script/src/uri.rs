//! Syntax check for SIP and SIPS URIs (RFC 3261 section 19.1)
//!
//! Only the shape of the URI is validated; the parts are borrowed from the
//! input and returned so callers can log them.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, recognize, verify},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{PuaScriptError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriScheme {
    Sip,
    Sips,
}

/// Parts of a syntactically valid SIP URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SipUri<'a> {
    pub scheme: UriScheme,
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub host: &'a str,
    pub port: Option<u16>,
    pub params: Vec<(&'a str, Option<&'a str>)>,
    pub headers: Option<&'a str>,
}

/// Parse `input` as a complete SIP or SIPS URI
pub fn parse_sip_uri(input: &str) -> Result<SipUri<'_>> {
    match all_consuming(sip_uri)(input) {
        Ok((_, uri)) => Ok(uri),
        Err(e) => Err(PuaScriptError::InvalidUri(format!("{}: {}", input, e))),
    }
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c)
}

fn is_user_char(c: char) -> bool {
    is_unreserved(c) || "%&=+$,;?/".contains(c)
}

fn is_password_char(c: char) -> bool {
    is_unreserved(c) || "%&=+$,".contains(c)
}

fn is_hostname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

fn is_ipv6_char(c: char) -> bool {
    c.is_ascii_hexdigit() || c == ':' || c == '.'
}

fn is_param_char(c: char) -> bool {
    is_unreserved(c) || "%[]/:&+$".contains(c)
}

fn is_header_char(c: char) -> bool {
    is_unreserved(c) || "%[]/?:+$=&".contains(c)
}

// Labels are non-empty and do not start or end with '-'; a trailing dot is allowed
fn valid_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    !host.is_empty()
        && host
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

fn scheme(input: &str) -> IResult<&str, UriScheme> {
    terminated(
        alt((
            map(tag_no_case("sips"), |_| UriScheme::Sips),
            map(tag_no_case("sip"), |_| UriScheme::Sip),
        )),
        char(':'),
    )(input)
}

fn userinfo(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    terminated(
        pair(
            take_while1(is_user_char),
            opt(preceded(char(':'), take_while(is_password_char))),
        ),
        char('@'),
    )(input)
}

fn host(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(char('['), take_while1(is_ipv6_char), char(']'))),
        verify(take_while1(is_hostname_char), valid_hostname),
    ))(input)
}

fn port(input: &str) -> IResult<&str, u16> {
    preceded(char(':'), map_res(digit1, str::parse::<u16>))(input)
}

fn uri_param(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    preceded(
        char(';'),
        pair(
            take_while1(is_param_char),
            opt(preceded(char('='), take_while1(is_param_char))),
        ),
    )(input)
}

fn sip_uri(input: &str) -> IResult<&str, SipUri<'_>> {
    map(
        tuple((
            scheme,
            opt(userinfo),
            host,
            opt(port),
            many0(uri_param),
            opt(preceded(char('?'), take_while1(is_header_char))),
        )),
        |(scheme, userinfo, host, port, params, headers)| SipUri {
            scheme,
            user: userinfo.map(|(user, _)| user),
            password: userinfo.and_then(|(_, password)| password),
            host,
            port,
            params,
            headers,
        },
    )(input)
}
