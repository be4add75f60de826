/* Copyright (C) 2025 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Plural rules.
//!
//! A [`PluralRules`] value is an ordered list of category names ("one", "few", "other", ...)
//! together with a compiled selection expression. The expression uses the C syntax of the
//! gettext `Plural-Forms` header, so the rules for a new language are written as data:
//!
//! ```
//! use tscat::PluralRules;
//!
//! let russian = PluralRules::new(
//!     ["one", "few", "many"],
//!     "n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2",
//! )
//! .unwrap();
//! assert_eq!(russian.category(21), "one");
//! assert_eq!(russian.category(3), "few");
//! assert_eq!(russian.category(11), "many");
//! ```

use std::fmt;

/// Error returned when a plural rule expression cannot be compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid plural rule '{rule}': {reason} at offset {offset}")]
pub struct PluralRuleError {
    rule: String,
    reason: &'static str,
    offset: usize,
}

impl PluralRuleError {
    /// The expression that failed to compile.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Byte offset in [`Self::rule`] where compilation stopped.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Category names and the expression that picks one of them for a count.
#[derive(Clone)]
pub struct PluralRules {
    categories: Box<[String]>,
    rule: String,
    expression: Expr,
}

impl PluralRules {
    /// Compiles `rule` and attaches the ordered `categories` to it.
    ///
    /// The expression must evaluate to the index of a category. Values outside of the
    /// category list are clamped to the last category when evaluated.
    pub fn new<I, S>(categories: I, rule: &str) -> Result<Self, PluralRuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: Box<[String]> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(PluralRuleError {
                rule: rule.to_owned(),
                reason: "no plural category",
                offset: 0,
            });
        }
        Ok(Self {
            categories,
            rule: rule.trim().to_owned(),
            expression: compile(rule)?,
        })
    }

    /// Parses the value of a gettext `Plural-Forms` header, for example
    /// `nplurals=2; plural=(n != 1);`.
    ///
    /// A missing `nplurals` defaults to two categories. The category names are derived from
    /// the count since the header does not carry them.
    pub fn from_plural_forms(header: &str) -> Result<Self, PluralRuleError> {
        let mut count = None;
        let mut rule = None;
        for entry in header.split(';') {
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            match key.trim() {
                "nplurals" => {
                    count = Some(value.trim().parse::<usize>().map_err(|_| PluralRuleError {
                        rule: header.to_owned(),
                        reason: "can't parse nplurals",
                        offset: 0,
                    })?)
                }
                "plural" => rule = Some(value),
                _ => {}
            }
        }
        let rule = rule.ok_or_else(|| PluralRuleError {
            rule: header.to_owned(),
            reason: "missing plural expression",
            offset: 0,
        })?;
        let count = count.unwrap_or(2);
        let categories: Vec<String> = match count {
            1 => vec!["other".into()],
            2 => vec!["one".into(), "other".into()],
            _ => (0..count).map(|i| format!("form{i}")).collect(),
        };
        Self::new(categories, rule)
    }

    /// Two categories: "one" for exactly 1 and "other" for everything else.
    pub fn one_other() -> Self {
        Self {
            categories: vec!["one".to_owned(), "other".to_owned()].into_boxed_slice(),
            rule: "n != 1".into(),
            expression: Expr::Binary(BinaryOp::NotEqual, Box::new(Expr::N), Box::new(Expr::Literal(1))),
        }
    }

    /// Number of categories, which is the number of variants a plural message should carry.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// The category names, in variant order.
    pub fn categories(&self) -> impl ExactSizeIterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// The source of the selection expression.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Index of the category of `n`, always within `0..category_count()`.
    pub fn category_index(&self, n: u64) -> usize {
        let index = self.expression.evaluate(n);
        usize::try_from(index)
            .unwrap_or(usize::MAX)
            .min(self.categories.len() - 1)
    }

    /// Name of the category of `n`.
    pub fn category(&self, n: u64) -> &str {
        &self.categories[self.category_index(n)]
    }

    /// Variant index for an optional count. `None` means the text does not vary by count
    /// and always selects the first variant.
    pub fn select(&self, count: Option<u64>) -> usize {
        count.map_or(0, |n| self.category_index(n))
    }
}

impl Default for PluralRules {
    fn default() -> Self {
        Self::one_other()
    }
}

impl PartialEq for PluralRules {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories && self.rule == other.rule
    }
}

impl fmt::Debug for PluralRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralRules")
            .field("categories", &self.categories)
            .field("rule", &self.rule)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Greater,
    Smaller,
    GreaterOrEqual,
    SmallerOrEqual,
    Modulo,
}

impl BinaryOp {
    fn apply(self, lhs: u64, rhs: u64) -> u64 {
        match self {
            Self::Or => (lhs != 0 || rhs != 0) as u64,
            Self::And => (lhs != 0 && rhs != 0) as u64,
            Self::Equal => (lhs == rhs) as u64,
            Self::NotEqual => (lhs != rhs) as u64,
            Self::Greater => (lhs > rhs) as u64,
            Self::Smaller => (lhs < rhs) as u64,
            Self::GreaterOrEqual => (lhs >= rhs) as u64,
            Self::SmallerOrEqual => (lhs <= rhs) as u64,
            // `n % 0` selects the first form instead of trapping
            Self::Modulo => lhs.checked_rem(rhs).unwrap_or(0),
        }
    }
}

#[derive(Clone, Debug)]
enum Expr {
    Literal(u64),
    N,
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn evaluate(&self, n: u64) -> u64 {
        match self {
            Self::Literal(value) => *value,
            Self::N => n,
            Self::Binary(op, lhs, rhs) => op.apply(lhs.evaluate(n), rhs.evaluate(n)),
            Self::Conditional(condition, when_true, when_false) => {
                if condition.evaluate(n) != 0 {
                    when_true.evaluate(n)
                } else {
                    when_false.evaluate(n)
                }
            }
        }
    }
}

fn compile(rule: &str) -> Result<Expr, PluralRuleError> {
    let mut parser = Parser {
        input: rule.as_bytes(),
        pos: 0,
    };
    let expr = parser.conditional()?;
    parser.skip_whitespace();
    if parser.pos != parser.input.len() {
        return Err(parser.error("extra character in string"));
    }
    Ok(expr)
}

/// Recursive descent over the C operator precedence levels used by gettext rules.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> PluralRuleError {
        PluralRuleError {
            rule: String::from_utf8_lossy(self.input).into_owned(),
            reason,
            offset: self.pos,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.input.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, token: &[u8]) -> bool {
        self.skip_whitespace();
        if self.input[self.pos..].starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// `<or> ('?' <conditional> ':' <conditional>)?`
    fn conditional(&mut self) -> Result<Expr, PluralRuleError> {
        let condition = self.or()?;
        if !self.eat(b"?") {
            return Ok(condition);
        }
        let when_true = self.conditional()?;
        if !self.eat(b":") {
            return Err(self.error("expected ':'"));
        }
        let when_false = self.conditional()?;
        Ok(Expr::Conditional(
            Box::new(condition),
            Box::new(when_true),
            Box::new(when_false),
        ))
    }

    /// `<and> ('||' <and>)*`
    fn or(&mut self) -> Result<Expr, PluralRuleError> {
        let mut lhs = self.and()?;
        while self.eat(b"||") {
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    /// `<equality> ('&&' <equality>)*`
    fn and(&mut self) -> Result<Expr, PluralRuleError> {
        let mut lhs = self.equality()?;
        while self.eat(b"&&") {
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(self.equality()?));
        }
        Ok(lhs)
    }

    /// `<relation> (('=='|'!=') <relation>)*`
    fn equality(&mut self) -> Result<Expr, PluralRuleError> {
        let mut lhs = self.relation()?;
        loop {
            let op = if self.eat(b"==") {
                BinaryOp::Equal
            } else if self.eat(b"!=") {
                BinaryOp::NotEqual
            } else {
                return Ok(lhs);
            };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(self.relation()?));
        }
    }

    /// `<modulo> (('<='|'>='|'<'|'>') <modulo>)*`
    fn relation(&mut self) -> Result<Expr, PluralRuleError> {
        let mut lhs = self.modulo()?;
        loop {
            let op = if self.eat(b"<=") {
                BinaryOp::SmallerOrEqual
            } else if self.eat(b">=") {
                BinaryOp::GreaterOrEqual
            } else if self.eat(b"<") {
                BinaryOp::Smaller
            } else if self.eat(b">") {
                BinaryOp::Greater
            } else {
                return Ok(lhs);
            };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(self.modulo()?));
        }
    }

    /// `<term> ('%' <term>)*`
    fn modulo(&mut self) -> Result<Expr, PluralRuleError> {
        let mut lhs = self.term()?;
        while self.eat(b"%") {
            lhs = Expr::Binary(BinaryOp::Modulo, Box::new(lhs), Box::new(self.term()?));
        }
        Ok(lhs)
    }

    /// `'n' | <number> | '(' <conditional> ')'`
    fn term(&mut self) -> Result<Expr, PluralRuleError> {
        self.skip_whitespace();
        match self.input.get(self.pos) {
            None => Err(self.error("unexpected end of string")),
            Some(b'n') => {
                self.pos += 1;
                Ok(Expr::N)
            }
            Some(b'(') => {
                self.pos += 1;
                let expr = self.conditional()?;
                if !self.eat(b")") {
                    return Err(self.error("expected ')'"));
                }
                Ok(expr)
            }
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while self.input.get(self.pos).is_some_and(u8::is_ascii_digit) {
                    self.pos += 1;
                }
                std::str::from_utf8(&self.input[start..self.pos])
                    .ok()
                    .and_then(|digits| digits.parse().ok())
                    .map(Expr::Literal)
                    .ok_or_else(|| self.error("can't parse number"))
            }
            Some(_) => Err(self.error("unexpected token")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn indices(rule: &str, count: usize, ns: &[u64]) -> Vec<usize> {
        let categories = (0..count).map(|i| format!("c{i}"));
        let rules = PluralRules::new(categories, rule).expect("parse error");
        ns.iter().map(|&n| rules.category_index(n)).collect()
    }

    #[test]
    fn english_and_french() {
        assert_eq!(indices("n != 1", 2, &[0, 1, 2, 5]), [1, 0, 1, 1]);
        assert_eq!(indices("n > 1", 2, &[0, 1, 2, 5]), [0, 0, 1, 1]);
    }

    #[test]
    fn japanese_single_form() {
        assert_eq!(indices("0", 1, &[0, 1, 100]), [0, 0, 0]);
    }

    #[test]
    fn slavic_rules() {
        let ru = "(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)";
        assert_eq!(
            indices(ru, 3, &[1, 2, 4, 5, 11, 12, 21, 22, 25, 111, 101]),
            [0, 1, 1, 2, 2, 2, 0, 1, 2, 2, 0]
        );
        let pl = "(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2)";
        assert_eq!(indices(pl, 3, &[1, 2, 5, 21, 22, 112]), [0, 1, 2, 2, 1, 2]);
    }

    #[test]
    fn arabic_and_irish() {
        let ar = "(n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5)";
        assert_eq!(indices(ar, 6, &[0, 1, 2, 3, 10, 11, 99, 100, 102]), [0, 1, 2, 3, 3, 4, 4, 5, 5]);
        let ga = "n==1 ? 0 : n==2 ? 1 : (n>2 && n<7) ? 2 :(n>6 && n<11) ? 3 : 4";
        assert_eq!(indices(ga, 5, &[1, 2, 3, 7, 11]), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn index_is_clamped_to_categories() {
        // the rule produces 2 but only two categories exist
        assert_eq!(indices("n==1 ? 0 : n==2 ? 1 : 2", 2, &[1, 2, 3]), [0, 1, 1]);
    }

    #[test]
    fn modulo_by_zero_does_not_trap() {
        assert_eq!(indices("n % 0", 2, &[7]), [0]);
    }

    #[test]
    fn select_without_count_picks_first_variant() {
        let rules = PluralRules::one_other();
        assert_eq!(rules.select(None), 0);
        assert_eq!(rules.select(Some(1)), 0);
        assert_eq!(rules.select(Some(2)), 1);
        assert_eq!(rules.category(2), "other");
    }

    #[test]
    fn invalid_rules() {
        let err = PluralRules::new(["a", "b"], "n !=").unwrap_err();
        assert_eq!(err.rule(), "n !=");
        assert_eq!(err.offset(), 4);
        assert!(PluralRules::new(["a"], "n ? 1").is_err());
        assert!(PluralRules::new(["a"], "(n").is_err());
        assert!(PluralRules::new(["a"], "n x").is_err());
        assert!(PluralRules::new(Vec::<String>::new(), "0").is_err());
    }

    #[test]
    fn plural_forms_header() {
        let rules = PluralRules::from_plural_forms("nplurals=2; plural=(n != 1);").unwrap();
        assert_eq!(rules.categories().collect::<Vec<_>>(), ["one", "other"]);
        assert_eq!(rules.category_index(0), 1);

        let rules = PluralRules::from_plural_forms(
            "nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);",
        )
        .unwrap();
        assert_eq!(rules.category_count(), 3);
        assert_eq!(rules.category(3), "form1");

        let rules = PluralRules::from_plural_forms("nplurals=1; plural=0;").unwrap();
        assert_eq!(rules.category(12), "other");

        assert!(PluralRules::from_plural_forms("nplurals=2;").is_err());
        assert!(PluralRules::from_plural_forms("nplurals=two; plural=n != 1;").is_err());
    }
}
