/// Pieces of canonical S-expression text
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Open,
    Close,
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub piece: Piece,
    pub line: u32,
}

fn is_delimiter(c: char) -> bool {
    c == '(' || c == ')' || c.is_whitespace()
}

/// Splits canonical text into parentheses and atoms. There is nothing to reject at this level:
/// every run of characters that is not whitespace or a parenthesis is an atom.
pub struct Lexer {
    source: Vec<char>,
    pieces: Vec<Lexed>,
    // first character in current atom
    start: usize,
    // current character
    current: usize,
    // current line
    line: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pieces: vec![],
            start: 0,
            current: 0,
            line: 1,
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn add_piece(&mut self, piece: Piece) {
        self.pieces.push(Lexed {
            piece,
            line: self.line,
        });
    }

    fn scan_piece(&mut self) {
        match self.advance() {
            '(' => self.add_piece(Piece::Open),
            ')' => self.add_piece(Piece::Close),
            '\n' => self.line += 1,
            c if c.is_whitespace() => {}
            _ => {
                while self.peek().is_some_and(|c| !is_delimiter(c)) {
                    self.advance();
                }
                let atom = String::from_iter(&self.source[self.start..self.current]);
                self.add_piece(Piece::Atom(atom));
            }
        }
    }

    pub fn scan(mut self) -> Vec<Lexed> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_piece();
        }
        self.pieces
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pieces(source: &str) -> Vec<Piece> {
        Lexer::new(source)
            .scan()
            .into_iter()
            .map(|lexed| lexed.piece)
            .collect()
    }

    #[test]
    fn test_scan_nested_form() {
        assert_eq!(
            pieces("(* (- 123) (group 45.67))"),
            vec![
                Piece::Open,
                Piece::Atom("*".to_owned()),
                Piece::Open,
                Piece::Atom("-".to_owned()),
                Piece::Atom("123".to_owned()),
                Piece::Close,
                Piece::Open,
                Piece::Atom("group".to_owned()),
                Piece::Atom("45.67".to_owned()),
                Piece::Close,
                Piece::Close,
            ]
        );
    }

    #[test]
    fn test_scan_counts_lines() {
        let lexed = Lexer::new("(print 1)\n\n(expr 2)").scan();
        let lines: Vec<u32> = lexed.iter().map(|l| l.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 1, 3, 3, 3, 3]);
    }
}
