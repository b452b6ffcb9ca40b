use std::fmt;

/// A location in the source buffer.
///
/// Lines and columns are zero-based and counted in bytes; `length` is the byte
/// length of the token or node head the position was taken from. Every token
/// and every AST node except [`Program`] carries one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Zero-based line number.
    pub line:   usize,
    /// Zero-based byte column within the line.
    pub column: usize,
    /// Byte length of the token this position was taken from.
    pub length: usize,
}

impl Position {
    /// Creates a new position.
    ///
    /// ## Example
    /// ```
    /// use quip::ast::Position;
    ///
    /// let position = Position::new(2, 4, 3);
    ///
    /// assert_eq!(position.to_string(), "3:5");
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize, length: usize) -> Self {
        Self { line,
               column,
               length }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A constant written directly in source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    /// `true` or `false`.
    Bool(bool),
    /// A decimal integer literal.
    Int(i64),
    /// A single-quoted string literal, without the quotes.
    Str(String),
}

/// Reference to a binding by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The referenced name.
    pub name:     String,
    /// Location of the name token.
    pub position: Position,
}

/// A literal expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// The constant value.
    pub value:    LiteralValue,
    /// Location of the literal token.
    pub position: Position,
}

/// Binary operators, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Membership (`in`)
    In,
    /// Negated membership (`not in`)
    NotIn,
    /// Structural equality (`==`)
    Equal,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Addition, concatenation or union (`+`)
    Add,
    /// Subtraction or difference (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Truncating integer division (`/`)
    Div,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, In, Less, LessEqual, Mul, NotIn, Sub,
        };
        let operator = match self {
            In => "in",
            NotIn => "not in",
            Equal => "==",
            Greater => ">",
            GreaterEqual => ">=",
            Less => "<",
            LessEqual => "<=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
        };
        write!(f, "{operator}")
    }
}

/// `left <operator> right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpression {
    /// Left operand.
    pub left:     Box<Expr>,
    /// The operator.
    pub operator: BinaryOperator,
    /// Right operand.
    pub right:    Box<Expr>,
    /// Location of the operator token.
    pub position: Position,
}

/// `target = value`, where the target is a [`Variable`] or a [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    /// The assigned place.
    pub target:   Expr,
    /// The assigned expression.
    pub value:    Expr,
    /// Location of the first token of the target.
    pub position: Position,
}

/// A list literal, `[a, b, c]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    /// Element expressions in source order.
    pub values:   Vec<Expr>,
    /// Location of the opening bracket.
    pub position: Position,
}

/// A brace-delimited sequence of statements.
///
/// Blocks are the bodies of functions, conditionals and loops. In expression
/// position a block whose statements are all assignments to bare names is a
/// mapping literal:
///
/// ```text
/// point = {
///     x = 1
///     y = 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Statements, including new-line and comment trivia.
    pub statements: Vec<Statement>,
    /// Location of the opening brace.
    pub position:   Position,
}

impl Block {
    /// Position of the last statement, or of the opening brace when empty.
    #[must_use]
    pub fn end_position(&self) -> Position {
        self.statements
            .last()
            .map_or(self.position, Statement::position)
    }

    /// Whether `line` falls between the opening brace and the last statement.
    ///
    /// ## Example
    /// ```
    /// use quip::{ast::Statement, parse};
    ///
    /// let program = parse("f(a) {\n  b = a\n  return b\n}").unwrap();
    /// let Statement::Function(function) = &program.statements[0] else {
    ///     unreachable!()
    /// };
    ///
    /// assert!(function.body.contains_line(1));
    /// assert!(!function.body.contains_line(5));
    /// ```
    #[must_use]
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.position.line && line <= self.end_position().line
    }
}

/// A user-defined function, `name(a, b) { ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Name the function is bound to.
    pub name:       String,
    /// Parameter names, bound positionally on call.
    pub parameters: Vec<Variable>,
    /// The function body.
    pub body:       Block,
    /// Location of the name token.
    pub position:   Position,
}

impl Function {
    /// The call signature, e.g. `add(a, b)`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, join(&self.parameters, ", "))
    }
}

/// A call by name, `name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Callee name; natives are resolved before scoped bindings.
    pub name:       String,
    /// Argument expressions, evaluated left to right.
    pub parameters: Vec<Expr>,
    /// Location of the name token.
    pub position:   Position,
}

/// `if condition { body } else { else_body }`.
///
/// `else if` chains are stored as an `else_body` holding a single nested
/// [`IfStatement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    pub condition: Expr,
    pub body:      Block,
    pub else_body: Option<Block>,
    /// Location of the `if` keyword.
    pub position:  Position,
}

/// `for index, item in iterable { body }`; the index name is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStatement {
    pub index:    Option<Variable>,
    pub item:     Variable,
    pub iterable: Expr,
    pub body:     Block,
    /// Location of the `for` keyword.
    pub position: Position,
}

/// `return` with an optional value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub value:    Option<Expr>,
    pub position: Position,
}

/// The member half of a [`Field`] access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// `object.name`
    Name(Variable),
    /// `object.name(args)`
    Call(FunctionCall),
    /// `object[expr]`
    Index(Box<Expr>),
}

/// Member access on an object, `object.member` or `object[key]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The accessed object.
    pub object:   Box<Expr>,
    /// The accessed member.
    pub member:   Member,
    /// Location of the first token of the object.
    pub position: Position,
}

/// A `//` comment kept as trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text without the leading `//`.
    pub text:     String,
    pub position: Position,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Variable(Variable),
    Literal(Literal),
    Binary(BinaryExpression),
    List(List),
    /// A mapping literal.
    Block(Block),
    Call(FunctionCall),
    Field(Field),
}

impl Expr {
    /// Gets the source position of the expression.
    /// ## Example
    /// ```
    /// use quip::ast::{Expr, Position, Variable};
    ///
    /// let expr = Expr::Variable(Variable { name:     "x".to_string(),
    ///                                      position: Position::new(5, 2, 1), });
    ///
    /// assert_eq!(expr.position().line, 5);
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Variable(Variable { position, .. })
            | Self::Literal(Literal { position, .. })
            | Self::Binary(BinaryExpression { position, .. })
            | Self::List(List { position, .. })
            | Self::Block(Block { position, .. })
            | Self::Call(FunctionCall { position, .. })
            | Self::Field(Field { position, .. }) => *position,
        }
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assign(Assign),
    Function(Function),
    If(IfStatement),
    For(ForStatement),
    Return(Return),
    Break(Position),
    Continue(Position),
    /// An expression evaluated for effect, typically a call.
    Expression(Expr),
    /// A line break. Blank lines show up as consecutive new-lines.
    NewLine(Position),
    Comment(Comment),
}

impl Statement {
    /// Gets the source position of the statement.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Assign(Assign { position, .. })
            | Self::Function(Function { position, .. })
            | Self::If(IfStatement { position, .. })
            | Self::For(ForStatement { position, .. })
            | Self::Return(Return { position, .. })
            | Self::Comment(Comment { position, .. })
            | Self::Break(position)
            | Self::Continue(position)
            | Self::NewLine(position) => *position,
            Self::Expression(expr) => expr.position(),
        }
    }

    /// Whether the statement is a new-line or comment with no runtime effect.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::NewLine(_) | Self::Comment(_))
    }
}

/// The root of a parsed source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Top-level statements in source order, trivia included.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Top-level function definitions.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.statements.iter().filter_map(|statement| match statement {
                                  Statement::Function(function) => Some(function),
                                  _ => None,
                              })
    }

    /// Top-level call statements.
    pub fn calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.statements.iter().filter_map(|statement| match statement {
                                  Statement::Expression(Expr::Call(call)) => Some(call),
                                  _ => None,
                              })
    }
}

/// Collects the comments documenting the declaration at `position`.
///
/// A declaration is a function definition or an assignment to a bare name. The
/// run of comments directly above it is returned; a blank line (two
/// consecutive new-lines) or any other statement in between ends the run.
///
/// ## Example
/// ```
/// use quip::{
///     ast::{Statement, doc_comments},
///     parse,
/// };
///
/// let program = parse("// unrelated\n\n// adds things\nadd(a, b) {\n  return a + b\n}").unwrap();
/// let add = program.functions().next().unwrap();
///
/// let docs = doc_comments(&program.statements, add.position);
///
/// assert_eq!(docs.len(), 1);
/// assert_eq!(docs[0].text, " adds things");
/// ```
#[must_use]
pub fn doc_comments(statements: &[Statement], position: Position) -> Vec<&Comment> {
    let mut comments = Vec::new();
    let mut new_lines = 0;

    for statement in statements {
        match statement {
            Statement::Comment(comment) => {
                comments.push(comment);
                new_lines = 0;
            },
            Statement::NewLine(_) => {
                new_lines += 1;
                if new_lines > 1 {
                    comments.clear();
                }
            },
            declaration @ (Statement::Function(_) | Statement::Assign(_))
                if declaration.position() == position =>
            {
                return comments;
            },
            _ => {
                comments.clear();
                new_lines = 0;
            },
        }
    }

    Vec::new()
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items.iter()
         .map(ToString::to_string)
         .collect::<Vec<_>>()
         .join(separator)
}

/// Renders an operand, parenthesising nested binary expressions so the tree
/// shape survives re-parsing.
fn operand(expr: &Expr) -> String {
    match expr {
        Expr::Binary(_) => format!("({expr})"),
        _ => expr.to_string(),
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Int(n) => write!(f, "{n}"),
            LiteralValue::Str(s) => write!(f, "'{s}'"),
        }
    }
}

impl fmt::Display for BinaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "{} {} {}",
               operand(&self.left),
               self.operator,
               operand(&self.right))
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join(&self.values, ", "))
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.signature(), self.body)
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, join(&self.parameters, ", "))
    }
}

impl fmt::Display for IfStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if {} {}", self.condition, self.body)?;
        match &self.else_body {
            Some(Block { statements, .. })
                if matches!(statements.as_slice(), [Statement::If(_)]) =>
            {
                write!(f, " else {}", statements[0])
            },
            Some(block) => write!(f, " else {block}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ForStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for ")?;
        if let Some(index) = &self.index {
            write!(f, "{index}, ")?;
        }
        write!(f, "{} in {} {}", self.item, self.iterable, self.body)
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value}"),
            None => write!(f, "return"),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = operand(&self.object);
        match &self.member {
            Member::Name(name) => write!(f, "{object}.{name}"),
            Member::Call(call) => write!(f, "{object}.{call}"),
            Member::Index(index) => write!(f, "{object}[{index}]"),
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}", self.text)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => v.fmt(f),
            Self::Literal(l) => l.fmt(f),
            Self::Binary(b) => b.fmt(f),
            Self::List(l) => l.fmt(f),
            Self::Block(b) => b.fmt(f),
            Self::Call(c) => c.fmt(f),
            Self::Field(field) => field.fmt(f),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign(a) => a.fmt(f),
            Self::Function(function) => function.fmt(f),
            Self::If(i) => i.fmt(f),
            Self::For(l) => l.fmt(f),
            Self::Return(r) => r.fmt(f),
            Self::Break(_) => write!(f, "break"),
            Self::Continue(_) => write!(f, "continue"),
            Self::Expression(e) => e.fmt(f),
            Self::NewLine(_) => writeln!(f),
            Self::Comment(c) => c.fmt(f),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
