//! Recursive-descent parser building green trees.
//!
//! The parser covers the declaration, statement and expression forms the
//! analyzers inspect. Anything outside that subset is reported as a
//! [`ParseError`] rather than recovered from, so every tree handed to the
//! engine is well formed.

use crate::green::{GreenElement, GreenNode, GreenToken};
#[allow(clippy::enum_glob_use)]
use crate::kind::SyntaxKind::{self, *};
use crate::lexer::tokenize;
use crate::ParseError;

type PResult<T> = Result<T, ParseError>;

/// Parses a whole compilation unit.
///
/// # Errors
///
/// Returns a [`ParseError`] on the first lexical or syntactic error.
pub fn parse_compilation_unit(source: &str) -> PResult<GreenNode> {
    let mut parser = Parser::new(tokenize(source)?);
    parser.compilation_unit()
}

/// Parses a standalone expression such as `default(int)`.
///
/// Trivia before the first token and after the last one is kept on those
/// tokens; trivia on a following line is dropped.
///
/// # Errors
///
/// Returns a [`ParseError`] if `text` is not exactly one expression.
pub fn parse_expression(text: &str) -> PResult<GreenNode> {
    let mut parser = Parser::new(tokenize(text)?);
    let expr = parser.expression()?;
    if !parser.at(EndOfFile) {
        return Err(parser.error("end of expression"));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<GreenToken>,
    starts: Vec<usize>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<GreenToken>) -> Self {
        let mut starts = Vec::with_capacity(tokens.len());
        let mut offset = 0;
        for token in &tokens {
            starts.push(offset + token.leading_len());
            offset += token.full_len();
        }
        Self {
            tokens,
            starts,
            pos: 0,
        }
    }

    // ---- token cursor ----

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map_or(EndOfFile, GreenToken::kind)
    }

    fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.tokens.get(self.pos + n).map_or("", GreenToken::text)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    fn at_word(&self, n: usize, word: &str) -> bool {
        self.nth(n) == Identifier && self.nth_text(n) == word
    }

    fn bump(&mut self) -> GreenElement {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| GreenToken::new(EndOfFile, ""));
        if token.kind() != EndOfFile {
            self.pos += 1;
        }
        token.into()
    }

    fn expect(&mut self, kind: SyntaxKind) -> PResult<GreenElement> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(&format!("{kind:?}")))
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let offset = self
            .starts
            .get(self.pos)
            .or_else(|| self.starts.last())
            .copied()
            .unwrap_or(0);
        ParseError::UnexpectedToken {
            offset,
            expected: expected.to_string(),
            found: self.peek(),
        }
    }

    /// Runs `f`, rewinding the cursor if it fails or `accept` rejects the result.
    fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<T>,
        accept: impl FnOnce(&Self) -> bool,
    ) -> Option<T> {
        let start = self.pos;
        match f(self) {
            Ok(value) if accept(self) => Some(value),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    // ---- declarations ----

    fn compilation_unit(&mut self) -> PResult<GreenNode> {
        let mut children = Vec::new();
        self.usings(&mut children)?;
        while !self.at(EndOfFile) {
            children.push(self.namespace_member()?.into());
        }
        children.push(self.bump());
        Ok(GreenNode::new(CompilationUnit, children))
    }

    fn usings(&mut self, children: &mut Vec<GreenElement>) -> PResult<()> {
        while self.at(UsingKeyword) {
            let mut using = vec![self.bump()];
            if self.at(StaticKeyword) {
                using.push(self.bump());
            }
            if self.at(Identifier) && self.nth(1) == Equals {
                using.push(self.bump());
                using.push(self.bump());
            }
            using.push(self.name(true)?.into());
            using.push(self.expect(Semicolon)?);
            children.push(GreenNode::new(UsingDirective, using).into());
        }
        Ok(())
    }

    fn namespace_member(&mut self) -> PResult<GreenNode> {
        if self.at(NamespaceKeyword) {
            self.namespace()
        } else {
            self.member()
        }
    }

    fn namespace(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump()];
        children.push(self.name(true)?.into());
        if self.at(Semicolon) {
            children.push(self.bump());
            self.usings(&mut children)?;
            while !self.at(EndOfFile) {
                children.push(self.namespace_member()?.into());
            }
            return Ok(GreenNode::new(FileScopedNamespaceDeclaration, children));
        }
        children.push(self.expect(OpenBrace)?);
        self.usings(&mut children)?;
        while !self.at(CloseBrace) && !self.at(EndOfFile) {
            children.push(self.namespace_member()?.into());
        }
        children.push(self.expect(CloseBrace)?);
        if self.at(Semicolon) {
            children.push(self.bump());
        }
        Ok(GreenNode::new(NamespaceDeclaration, children))
    }

    fn attribute_list(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump()];
        let mut depth = 1usize;
        loop {
            match self.peek() {
                EndOfFile => return Err(self.error("`]`")),
                OpenBracket => depth += 1,
                CloseBracket => depth -= 1,
                _ => {}
            }
            children.push(self.bump());
            if depth == 0 {
                return Ok(GreenNode::new(AttributeList, children));
            }
        }
    }

    fn attributes(&mut self, children: &mut Vec<GreenElement>) -> PResult<()> {
        while self.at(OpenBracket) {
            children.push(self.attribute_list()?.into());
        }
        Ok(())
    }

    fn at_modifier(&self) -> bool {
        if self.peek().is_modifier() {
            return true;
        }
        let word_follows = self.nth(1) == Identifier || self.nth(1).is_keyword();
        word_follows && (self.at_word(0, "partial") || self.at_word(0, "async"))
    }

    fn modifiers(&mut self, children: &mut Vec<GreenElement>) {
        while self.at_modifier() {
            children.push(self.bump());
        }
    }

    fn member(&mut self) -> PResult<GreenNode> {
        let mut children = Vec::new();
        self.attributes(&mut children)?;
        self.modifiers(&mut children);
        match self.peek() {
            ClassKeyword | StructKeyword | InterfaceKeyword => self.type_declaration(children),
            EnumKeyword => self.enum_declaration(children),
            Identifier if self.nth(1) == OpenParen => self.constructor(children),
            _ => {
                let ty = self.ty()?;
                if !self.at(Identifier) {
                    return Err(self.error("member name"));
                }
                match self.nth(1) {
                    OpenParen | Less => {
                        children.push(ty.into());
                        self.method(children)
                    }
                    OpenBrace | EqualsGreater => {
                        children.push(ty.into());
                        self.property(children)
                    }
                    _ => {
                        children.push(self.variable_declaration(ty)?.into());
                        children.push(self.expect(Semicolon)?);
                        Ok(GreenNode::new(FieldDeclaration, children))
                    }
                }
            }
        }
    }

    fn type_declaration(&mut self, mut children: Vec<GreenElement>) -> PResult<GreenNode> {
        let kind = match self.peek() {
            ClassKeyword => ClassDeclaration,
            StructKeyword => StructDeclaration,
            _ => InterfaceDeclaration,
        };
        children.push(self.bump());
        children.push(self.expect(Identifier)?);
        if self.at(Less) {
            children.push(self.type_argument_list()?.into());
        }
        if self.at(Colon) {
            children.push(self.base_list()?.into());
        }
        self.constraints(&mut children);
        children.push(self.expect(OpenBrace)?);
        while !self.at(CloseBrace) && !self.at(EndOfFile) {
            children.push(self.member()?.into());
        }
        children.push(self.expect(CloseBrace)?);
        if self.at(Semicolon) {
            children.push(self.bump());
        }
        Ok(GreenNode::new(kind, children))
    }

    fn base_list(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump()];
        children.push(self.ty()?.into());
        while self.at(Comma) {
            children.push(self.bump());
            children.push(self.ty()?.into());
        }
        Ok(GreenNode::new(BaseList, children))
    }

    /// `where T : ...` clauses are kept as plain tokens.
    fn constraints(&mut self, children: &mut Vec<GreenElement>) {
        if !self.at_word(0, "where") {
            return;
        }
        while !matches!(
            self.peek(),
            OpenBrace | Semicolon | EqualsGreater | EndOfFile
        ) {
            children.push(self.bump());
        }
    }

    fn enum_declaration(&mut self, mut children: Vec<GreenElement>) -> PResult<GreenNode> {
        children.push(self.bump());
        children.push(self.expect(Identifier)?);
        if self.at(Colon) {
            children.push(self.base_list()?.into());
        }
        children.push(self.expect(OpenBrace)?);
        while !self.at(CloseBrace) {
            let mut member = Vec::new();
            self.attributes(&mut member)?;
            member.push(self.expect(Identifier)?);
            if self.at(Equals) {
                member.push(self.equals_value()?.into());
            }
            children.push(GreenNode::new(EnumMemberDeclaration, member).into());
            if self.at(Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        children.push(self.expect(CloseBrace)?);
        if self.at(Semicolon) {
            children.push(self.bump());
        }
        Ok(GreenNode::new(EnumDeclaration, children))
    }

    fn equals_value(&mut self) -> PResult<GreenNode> {
        let equals = self.expect(Equals)?;
        let value = if self.at(OpenBrace) {
            self.initializer()?
        } else {
            self.expression()?
        };
        Ok(GreenNode::new(EqualsValueClause, vec![equals, value.into()]))
    }

    fn method(&mut self, mut children: Vec<GreenElement>) -> PResult<GreenNode> {
        children.push(self.bump());
        if self.at(Less) {
            children.push(self.type_argument_list()?.into());
        }
        children.push(self.parameter_list()?.into());
        self.constraints(&mut children);
        self.body(&mut children)?;
        Ok(GreenNode::new(MethodDeclaration, children))
    }

    fn constructor(&mut self, mut children: Vec<GreenElement>) -> PResult<GreenNode> {
        children.push(self.bump());
        children.push(self.parameter_list()?.into());
        if self.at(Colon) {
            children.push(self.bump());
            if !matches!(self.peek(), BaseKeyword | ThisKeyword) {
                return Err(self.error("`base` or `this`"));
            }
            children.push(self.bump());
            children.push(self.argument_list()?.into());
        }
        self.body(&mut children)?;
        Ok(GreenNode::new(ConstructorDeclaration, children))
    }

    /// Block body, expression body or a bare `;`.
    fn body(&mut self, children: &mut Vec<GreenElement>) -> PResult<()> {
        match self.peek() {
            OpenBrace => children.push(self.block()?.into()),
            EqualsGreater => {
                children.push(self.arrow_clause()?.into());
                children.push(self.expect(Semicolon)?);
            }
            _ => children.push(self.expect(Semicolon)?),
        }
        Ok(())
    }

    fn arrow_clause(&mut self) -> PResult<GreenNode> {
        let arrow = self.bump();
        let expr = self.expression()?;
        Ok(GreenNode::new(ArrowExpressionClause, vec![arrow, expr.into()]))
    }

    fn property(&mut self, mut children: Vec<GreenElement>) -> PResult<GreenNode> {
        children.push(self.bump());
        if self.at(EqualsGreater) {
            children.push(self.arrow_clause()?.into());
            children.push(self.expect(Semicolon)?);
            return Ok(GreenNode::new(PropertyDeclaration, children));
        }
        children.push(self.accessor_list()?.into());
        if self.at(Equals) {
            children.push(self.equals_value()?.into());
            children.push(self.expect(Semicolon)?);
        }
        Ok(GreenNode::new(PropertyDeclaration, children))
    }

    fn accessor_list(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(OpenBrace)?];
        while !self.at(CloseBrace) {
            let mut accessor = Vec::new();
            self.attributes(&mut accessor)?;
            self.modifiers(&mut accessor);
            if !(self.at_word(0, "get") || self.at_word(0, "set") || self.at_word(0, "init")) {
                return Err(self.error("`get`, `set` or `init`"));
            }
            accessor.push(self.bump());
            self.body(&mut accessor)?;
            children.push(GreenNode::new(AccessorDeclaration, accessor).into());
        }
        children.push(self.bump());
        Ok(GreenNode::new(AccessorList, children))
    }

    fn parameter_list(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(OpenParen)?];
        if !self.at(CloseParen) {
            loop {
                children.push(self.parameter()?.into());
                if self.at(Comma) {
                    children.push(self.bump());
                } else {
                    break;
                }
            }
        }
        children.push(self.expect(CloseParen)?);
        Ok(GreenNode::new(ParameterList, children))
    }

    fn parameter(&mut self) -> PResult<GreenNode> {
        let mut children = Vec::new();
        self.attributes(&mut children)?;
        loop {
            let word_follows = self.nth(1) == Identifier || self.nth(1).is_keyword();
            let contextual = ["ref", "out", "params"]
                .iter()
                .any(|word| self.at_word(0, word));
            if matches!(self.peek(), ThisKeyword | InKeyword) || (contextual && word_follows) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        children.push(self.ty()?.into());
        children.push(self.expect(Identifier)?);
        if self.at(Equals) {
            children.push(self.equals_value()?.into());
        }
        Ok(GreenNode::new(Parameter, children))
    }

    fn variable_declaration(&mut self, ty: GreenNode) -> PResult<GreenNode> {
        let mut children = vec![ty.into()];
        loop {
            let mut declarator = vec![self.expect(Identifier)?];
            if self.at(Equals) {
                declarator.push(self.equals_value()?.into());
            }
            children.push(GreenNode::new(VariableDeclarator, declarator).into());
            if self.at(Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        Ok(GreenNode::new(VariableDeclaration, children))
    }

    // ---- statements ----

    fn block(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(OpenBrace)?];
        while !self.at(CloseBrace) && !self.at(EndOfFile) {
            children.push(self.statement()?.into());
        }
        children.push(self.expect(CloseBrace)?);
        Ok(GreenNode::new(Block, children))
    }

    fn statement(&mut self) -> PResult<GreenNode> {
        match self.peek() {
            OpenBrace => self.block(),
            Semicolon => Ok(GreenNode::new(EmptyStatement, vec![self.bump()])),
            ReturnKeyword => {
                let mut children = vec![self.bump()];
                if !self.at(Semicolon) {
                    children.push(self.expression()?.into());
                }
                children.push(self.expect(Semicolon)?);
                Ok(GreenNode::new(ReturnStatement, children))
            }
            BreakKeyword => {
                let keyword = self.bump();
                let semi = self.expect(Semicolon)?;
                Ok(GreenNode::new(BreakStatement, vec![keyword, semi]))
            }
            ContinueKeyword => {
                let keyword = self.bump();
                let semi = self.expect(Semicolon)?;
                Ok(GreenNode::new(ContinueStatement, vec![keyword, semi]))
            }
            IfKeyword => self.if_statement(),
            WhileKeyword => {
                let mut children = vec![self.bump(), self.expect(OpenParen)?];
                children.push(self.expression()?.into());
                children.push(self.expect(CloseParen)?);
                children.push(self.statement()?.into());
                Ok(GreenNode::new(WhileStatement, children))
            }
            ForKeyword => self.for_statement(),
            ForEachKeyword => self.foreach_statement(),
            ConstKeyword => {
                let konst = self.bump();
                let ty = self.ty()?;
                let declaration = self.variable_declaration(ty)?;
                let semi = self.expect(Semicolon)?;
                Ok(GreenNode::new(
                    LocalDeclarationStatement,
                    vec![konst, declaration.into(), semi],
                ))
            }
            _ => {
                if let Some(ty) = self.local_type() {
                    let declaration = self.variable_declaration(ty)?;
                    let semi = self.expect(Semicolon)?;
                    return Ok(GreenNode::new(
                        LocalDeclarationStatement,
                        vec![declaration.into(), semi],
                    ));
                }
                let expr = self.expression()?;
                let semi = self.expect(Semicolon)?;
                Ok(GreenNode::new(ExpressionStatement, vec![expr.into(), semi]))
            }
        }
    }

    /// Parses a type if the tokens ahead read as `Type name =`, `Type name;`
    /// or `Type name,`. Otherwise nothing is consumed.
    fn local_type(&mut self) -> Option<GreenNode> {
        self.attempt(Self::ty, |p| {
            p.at(Identifier) && matches!(p.nth(1), Equals | Semicolon | Comma)
        })
    }

    fn if_statement(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump(), self.expect(OpenParen)?];
        children.push(self.expression()?.into());
        children.push(self.expect(CloseParen)?);
        children.push(self.statement()?.into());
        if self.at(ElseKeyword) {
            let keyword = self.bump();
            let body = self.statement()?;
            children.push(GreenNode::new(ElseClause, vec![keyword, body.into()]).into());
        }
        Ok(GreenNode::new(IfStatement, children))
    }

    fn for_statement(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump(), self.expect(OpenParen)?];
        if let Some(ty) = self.local_type() {
            children.push(self.variable_declaration(ty)?.into());
        } else {
            self.expression_list(&mut children, Semicolon)?;
        }
        children.push(self.expect(Semicolon)?);
        if !self.at(Semicolon) {
            children.push(self.expression()?.into());
        }
        children.push(self.expect(Semicolon)?);
        self.expression_list(&mut children, CloseParen)?;
        children.push(self.expect(CloseParen)?);
        children.push(self.statement()?.into());
        Ok(GreenNode::new(ForStatement, children))
    }

    fn expression_list(
        &mut self,
        children: &mut Vec<GreenElement>,
        terminator: SyntaxKind,
    ) -> PResult<()> {
        if self.at(terminator) {
            return Ok(());
        }
        children.push(self.expression()?.into());
        while self.at(Comma) {
            children.push(self.bump());
            children.push(self.expression()?.into());
        }
        Ok(())
    }

    fn foreach_statement(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump(), self.expect(OpenParen)?];
        children.push(self.ty()?.into());
        children.push(self.expect(Identifier)?);
        children.push(self.expect(InKeyword)?);
        children.push(self.expression()?.into());
        children.push(self.expect(CloseParen)?);
        children.push(self.statement()?.into());
        Ok(GreenNode::new(ForEachStatement, children))
    }

    // ---- types ----

    fn ty(&mut self) -> PResult<GreenNode> {
        let mut ty = if self.peek().is_predefined_type() {
            GreenNode::new(PredefinedType, vec![self.bump()])
        } else if self.at(Identifier) {
            self.name(true)?
        } else {
            return Err(self.error("type"));
        };
        loop {
            if self.at(Question) {
                let question = self.bump();
                ty = GreenNode::new(NullableType, vec![ty.into(), question]);
            } else if self.at(OpenBracket) && matches!(self.nth(1), CloseBracket | Comma) {
                let mut rank = vec![self.bump()];
                while self.at(Comma) {
                    rank.push(self.bump());
                }
                rank.push(self.expect(CloseBracket)?);
                let rank = GreenNode::new(ArrayRankSpecifier, rank);
                ty = GreenNode::new(ArrayType, vec![ty.into(), rank.into()]);
            } else {
                return Ok(ty);
            }
        }
    }

    /// A possibly qualified name. `in_type` forces `<` to start type arguments.
    fn name(&mut self, in_type: bool) -> PResult<GreenNode> {
        let mut name = self.simple_name(in_type)?;
        while self.at(Dot) && self.nth(1) == Identifier {
            let dot = self.bump();
            let right = self.simple_name(in_type)?;
            name = GreenNode::new(QualifiedName, vec![name.into(), dot, right.into()]);
        }
        Ok(name)
    }

    fn simple_name(&mut self, in_type: bool) -> PResult<GreenNode> {
        let identifier = self.expect(Identifier)?;
        if !self.at(Less) {
            return Ok(GreenNode::new(IdentifierName, vec![identifier]));
        }
        let arguments = if in_type {
            Some(self.type_argument_list()?)
        } else {
            self.attempt(Self::type_argument_list, |p| {
                matches!(
                    p.peek(),
                    OpenParen | CloseParen | Dot | Semicolon | Comma | CloseBracket | CloseBrace
                        | EndOfFile
                )
            })
        };
        Ok(match arguments {
            Some(arguments) => GreenNode::new(GenericName, vec![identifier, arguments.into()]),
            None => GreenNode::new(IdentifierName, vec![identifier]),
        })
    }

    fn type_argument_list(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(Less)?];
        children.push(self.ty()?.into());
        while self.at(Comma) {
            children.push(self.bump());
            children.push(self.ty()?.into());
        }
        children.push(self.expect(Greater)?);
        Ok(GreenNode::new(TypeArgumentList, children))
    }

    // ---- expressions ----

    fn expression(&mut self) -> PResult<GreenNode> {
        if let Some(lambda) = self.lambda()? {
            return Ok(lambda);
        }
        let target = self.conditional()?;
        if self.peek().is_assignment_operator() {
            let op = self.bump();
            let value = if self.at(OpenBrace) {
                self.initializer()?
            } else {
                self.expression()?
            };
            return Ok(GreenNode::new(
                AssignmentExpression,
                vec![target.into(), op, value.into()],
            ));
        }
        Ok(target)
    }

    fn lambda(&mut self) -> PResult<Option<GreenNode>> {
        let parameters = if self.at(Identifier) && self.nth(1) == EqualsGreater {
            let name = self.bump();
            GreenNode::new(Parameter, vec![name])
        } else if self.at(OpenParen) && self.lambda_parameters_ahead() {
            self.parameter_list_untyped()?
        } else {
            return Ok(None);
        };
        let arrow = self.expect(EqualsGreater)?;
        let body = if self.at(OpenBrace) {
            self.block()?
        } else {
            self.expression()?
        };
        Ok(Some(GreenNode::new(
            LambdaExpression,
            vec![parameters.into(), arrow, body.into()],
        )))
    }

    /// Looks past a balanced `( ... )` for `=>`.
    fn lambda_parameters_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            match self.nth(n) {
                OpenParen => depth += 1,
                CloseParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth(n + 1) == EqualsGreater;
                    }
                }
                EndOfFile | Semicolon | OpenBrace => return false,
                _ => {}
            }
            n += 1;
        }
    }

    /// Lambda parameters, where the type of each parameter is optional.
    fn parameter_list_untyped(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(OpenParen)?];
        while !self.at(CloseParen) {
            let mut parameter = Vec::new();
            if self.nth(1) != Comma && self.nth(1) != CloseParen {
                parameter.push(self.ty()?.into());
            }
            parameter.push(self.expect(Identifier)?);
            children.push(GreenNode::new(Parameter, parameter).into());
            if self.at(Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        children.push(self.expect(CloseParen)?);
        Ok(GreenNode::new(ParameterList, children))
    }

    fn conditional(&mut self) -> PResult<GreenNode> {
        let condition = self.binary(1)?;
        if !self.at(Question) {
            return Ok(condition);
        }
        let question = self.bump();
        let when_true = self.expression()?;
        let colon = self.expect(Colon)?;
        let when_false = self.expression()?;
        Ok(GreenNode::new(
            ConditionalExpression,
            vec![
                condition.into(),
                question,
                when_true.into(),
                colon,
                when_false.into(),
            ],
        ))
    }

    fn binary(&mut self, min_precedence: u8) -> PResult<GreenNode> {
        let mut left = self.unary()?;
        loop {
            if (self.at_word(0, "is") || self.at_word(0, "as")) && min_precedence <= RELATIONAL {
                let op = self.bump();
                let right = if self.at(Identifier) || self.peek().is_predefined_type() {
                    self.ty()?
                } else {
                    self.unary()?
                };
                left = GreenNode::new(BinaryExpression, vec![left.into(), op, right.into()]);
                continue;
            }
            let Some(precedence) = binary_precedence(self.peek()) else {
                return Ok(left);
            };
            if precedence < min_precedence {
                return Ok(left);
            }
            let op = self.bump();
            let right = self.binary(precedence + 1)?;
            left = GreenNode::new(BinaryExpression, vec![left.into(), op, right.into()]);
        }
    }

    fn unary(&mut self) -> PResult<GreenNode> {
        let prefix = matches!(
            self.peek(),
            Exclamation | Minus | Plus | Tilde | PlusPlus | MinusMinus
        ) || (self.at_word(0, "await") && starts_expression(self.nth(1)));
        if prefix {
            let op = self.bump();
            let operand = self.unary()?;
            return Ok(GreenNode::new(PrefixUnaryExpression, vec![op, operand.into()]));
        }
        let primary = self.primary()?;
        self.postfix(primary)
    }

    fn postfix(&mut self, mut expr: GreenNode) -> PResult<GreenNode> {
        loop {
            expr = match self.peek() {
                Dot => {
                    let dot = self.bump();
                    let name = self.simple_name(false)?;
                    GreenNode::new(MemberAccessExpression, vec![expr.into(), dot, name.into()])
                }
                OpenParen => {
                    let arguments = self.argument_list()?;
                    GreenNode::new(InvocationExpression, vec![expr.into(), arguments.into()])
                }
                OpenBracket => {
                    let arguments = self.bracketed_argument_list()?;
                    GreenNode::new(ElementAccessExpression, vec![expr.into(), arguments.into()])
                }
                PlusPlus | MinusMinus => {
                    let op = self.bump();
                    GreenNode::new(PostfixUnaryExpression, vec![expr.into(), op])
                }
                _ => return Ok(expr),
            };
        }
    }

    fn primary(&mut self) -> PResult<GreenNode> {
        match self.peek() {
            NumericLiteral | StringLiteral | CharacterLiteral | TrueKeyword | FalseKeyword
            | NullKeyword => Ok(GreenNode::new(LiteralExpression, vec![self.bump()])),
            Identifier => self.simple_name(false),
            ThisKeyword => Ok(GreenNode::new(ThisExpression, vec![self.bump()])),
            BaseKeyword => Ok(GreenNode::new(BaseExpression, vec![self.bump()])),
            NewKeyword => self.object_creation(),
            DefaultKeyword => {
                let keyword = self.bump();
                if !self.at(OpenParen) {
                    return Ok(GreenNode::new(LiteralExpression, vec![keyword]));
                }
                let open = self.bump();
                let ty = self.ty()?;
                let close = self.expect(CloseParen)?;
                Ok(GreenNode::new(
                    DefaultExpression,
                    vec![keyword, open, ty.into(), close],
                ))
            }
            TypeOfKeyword => {
                let keyword = self.bump();
                let open = self.expect(OpenParen)?;
                let ty = self.ty()?;
                let close = self.expect(CloseParen)?;
                Ok(GreenNode::new(
                    TypeOfExpression,
                    vec![keyword, open, ty.into(), close],
                ))
            }
            OpenParen => {
                if let Some(cast) = self.attempt(Self::cast, |_| true) {
                    return Ok(cast);
                }
                let open = self.bump();
                let inner = self.expression()?;
                let close = self.expect(CloseParen)?;
                Ok(GreenNode::new(
                    ParenthesizedExpression,
                    vec![open, inner.into(), close],
                ))
            }
            kind if kind.is_predefined_type() => {
                Ok(GreenNode::new(PredefinedType, vec![self.bump()]))
            }
            _ => Err(self.error("expression")),
        }
    }

    /// `(Type)operand`, accepted only when an operand directly follows.
    fn cast(&mut self) -> PResult<GreenNode> {
        let open = self.expect(OpenParen)?;
        let ty = self.ty()?;
        let close = self.expect(CloseParen)?;
        let operand_follows = match self.peek() {
            Identifier | NumericLiteral | StringLiteral | CharacterLiteral | TrueKeyword
            | FalseKeyword | NullKeyword | ThisKeyword | BaseKeyword | NewKeyword
            | DefaultKeyword | TypeOfKeyword | OpenParen | Exclamation | Tilde => true,
            kind => kind.is_predefined_type(),
        };
        if !operand_follows {
            return Err(self.error("cast operand"));
        }
        let operand = self.unary()?;
        Ok(GreenNode::new(
            CastExpression,
            vec![open, ty.into(), close, operand.into()],
        ))
    }

    fn object_creation(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.bump()];
        if !self.at(OpenParen) {
            children.push(self.ty()?.into());
        }
        let mut complete = false;
        if self.at(OpenParen) {
            children.push(self.argument_list()?.into());
            complete = true;
        }
        if self.at(OpenBrace) {
            children.push(self.initializer()?.into());
            complete = true;
        }
        if !complete {
            return Err(self.error("argument list or initializer"));
        }
        Ok(GreenNode::new(ObjectCreationExpression, children))
    }

    /// `{ ... }` after `new T`. Empty braces and braces starting with a
    /// `Name = value` element form an object initializer, anything else a
    /// collection initializer.
    fn initializer(&mut self) -> PResult<GreenNode> {
        let mut children = vec![self.expect(OpenBrace)?];
        let mut kind = ObjectInitializerExpression;
        let mut first = true;
        while !self.at(CloseBrace) {
            let element = self.initializer_element()?;
            if first {
                first = false;
                if !is_member_assignment(&element) {
                    kind = CollectionInitializerExpression;
                }
            }
            children.push(element.into());
            if self.at(Comma) {
                children.push(self.bump());
            } else {
                break;
            }
        }
        children.push(self.expect(CloseBrace)?);
        Ok(GreenNode::new(kind, children))
    }

    fn initializer_element(&mut self) -> PResult<GreenNode> {
        if self.at(OpenBrace) {
            self.initializer()
        } else {
            self.expression()
        }
    }

    fn argument_list(&mut self) -> PResult<GreenNode> {
        self.arguments(ArgumentList, OpenParen, CloseParen)
    }

    fn bracketed_argument_list(&mut self) -> PResult<GreenNode> {
        self.arguments(BracketedArgumentList, OpenBracket, CloseBracket)
    }

    fn arguments(
        &mut self,
        kind: SyntaxKind,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> PResult<GreenNode> {
        let mut children = vec![self.expect(open)?];
        if !self.at(close) {
            loop {
                let mut argument = Vec::new();
                if self.at(Identifier) && self.nth(1) == Colon {
                    argument.push(self.bump());
                    argument.push(self.bump());
                }
                let by_ref = ["ref", "out", "in"]
                    .iter()
                    .any(|word| self.at_word(0, word))
                    || self.at(InKeyword);
                if by_ref && starts_expression(self.nth(1)) {
                    argument.push(self.bump());
                }
                argument.push(self.expression()?.into());
                children.push(GreenNode::new(Argument, argument).into());
                if self.at(Comma) {
                    children.push(self.bump());
                } else {
                    break;
                }
            }
        }
        children.push(self.expect(close)?);
        Ok(GreenNode::new(kind, children))
    }
}

const RELATIONAL: u8 = 8;

fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    Some(match kind {
        QuestionQuestion => 1,
        BarBar => 2,
        AmpersandAmpersand => 3,
        Bar => 4,
        Caret => 5,
        Ampersand => 6,
        EqualsEquals | ExclamationEquals => 7,
        Less | LessEquals | Greater | GreaterEquals => RELATIONAL,
        Plus | Minus => 9,
        Asterisk | Slash | Percent => 10,
        _ => return None,
    })
}

fn starts_expression(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        Identifier
            | NumericLiteral
            | StringLiteral
            | CharacterLiteral
            | TrueKeyword
            | FalseKeyword
            | NullKeyword
            | ThisKeyword
            | BaseKeyword
            | NewKeyword
            | DefaultKeyword
            | TypeOfKeyword
            | OpenParen
            | Exclamation
            | Minus
            | Tilde
    ) || kind.is_predefined_type()
}

fn is_member_assignment(element: &GreenNode) -> bool {
    if element.kind() != AssignmentExpression {
        return false;
    }
    let mut children = element.children().iter();
    matches!(
        (children.next(), children.next()),
        (Some(GreenElement::Node(target)), Some(GreenElement::Token(op)))
            if target.kind() == IdentifierName && op.kind() == Equals
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::SyntaxNode;

    fn parse(source: &str) -> SyntaxNode {
        SyntaxNode::new_root(parse_compilation_unit(source).expect("parses"))
    }

    fn kinds_of(root: &SyntaxNode, kind: SyntaxKind) -> Vec<String> {
        root.descendants()
            .into_iter()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text())
            .collect()
    }

    fn outline(root: &SyntaxNode) -> String {
        root.descendants()
            .iter()
            .map(|n| format!("{}{:?}", "  ".repeat(n.ancestors().count() - 1), n.kind()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn generic_class_outline() {
        let root = parse("class Box<T> { public T[] Items; }");
        insta::assert_snapshot!(outline(&root), @r"
        CompilationUnit
          ClassDeclaration
            TypeArgumentList
              IdentifierName
            FieldDeclaration
              VariableDeclaration
                ArrayType
                  IdentifierName
                  ArrayRankSpecifier
                VariableDeclarator
        ");
    }

    const SAMPLE: &str = r#"using System;
using System.Collections.Generic;

namespace Demo
{
    /// <summary>
    /// Gets the name.
    /// </summary>
    public class Person : Base, IThing
    {
        private int count = 0;
        public string Name { get; private set; } = "x";
        public int Age => count;

        public Person(int start) : base(start) { count = start; }

        public void Run(List<int> items)
        {
            // loop over items
            for (int i = 0; i < items.Count; i++) { count += items[i]; }
            foreach (var item in items) { if (item > 0) continue; else break; }
            var p = new Person(1) { Name = "a" };
            var list = new List<int> { 1, 2 };
            int? maybe = null;
            const int Max = 10;
            string s = count > 1 ? "many" : (string)null;
            Func<int, int> f = x => x + 1;
            while (!done) { done = Check(out value); }
            return;
        }
    }

    enum Color { Red, Green = 1, Blue = 0 }
}
"#;

    #[test]
    fn round_trips_source() {
        assert_eq!(parse(SAMPLE).full_text(), SAMPLE);
    }

    #[test]
    fn recognizes_declarations() {
        let root = parse(SAMPLE);
        assert_eq!(kinds_of(&root, ClassDeclaration).len(), 1);
        assert_eq!(kinds_of(&root, PropertyDeclaration).len(), 2);
        assert_eq!(kinds_of(&root, MethodDeclaration).len(), 1);
        assert_eq!(kinds_of(&root, ConstructorDeclaration).len(), 1);
        assert_eq!(
            kinds_of(&root, EnumMemberDeclaration),
            vec!["Red", "Green = 1", "Blue = 0"]
        );
    }

    #[test]
    fn separates_declarations_from_expressions() {
        let root = parse(SAMPLE);
        let locals = kinds_of(&root, LocalDeclarationStatement);
        assert!(locals.contains(&"int? maybe = null;".to_string()));
        assert!(locals.contains(&"const int Max = 10;".to_string()));
        assert!(locals.contains(&"Func<int, int> f = x => x + 1;".to_string()));
        let statements = kinds_of(&root, ExpressionStatement);
        assert!(statements.contains(&"count = start;".to_string()));
        assert!(statements.contains(&"count += items[i];".to_string()));
    }

    #[test]
    fn classifies_initializers() {
        let root = parse(SAMPLE);
        assert_eq!(
            kinds_of(&root, ObjectInitializerExpression),
            vec!["{ Name = \"a\" }"]
        );
        assert_eq!(
            kinds_of(&root, CollectionInitializerExpression),
            vec!["{ 1, 2 }"]
        );
    }

    #[test]
    fn parses_casts_and_conditionals() {
        let root = parse(SAMPLE);
        assert_eq!(kinds_of(&root, CastExpression), vec!["(string)null"]);
        assert_eq!(kinds_of(&root, ConditionalExpression).len(), 1);
    }

    #[test]
    fn doc_comment_leads_the_declaration() {
        let root = parse(SAMPLE);
        let class = root
            .descendants()
            .into_iter()
            .find(|n| n.kind() == ClassDeclaration)
            .expect("class");
        let first = class.first_token().expect("token");
        assert!(first
            .leading_trivia()
            .iter()
            .any(|t| t.kind() == crate::TriviaKind::SingleLineDocComment));
    }

    #[test]
    fn file_scoped_namespace() {
        let root = parse("namespace A.B;\nclass C { }\n");
        assert_eq!(kinds_of(&root, FileScopedNamespaceDeclaration).len(), 1);
        assert_eq!(kinds_of(&root, ClassDeclaration), vec!["class C { }"]);
    }

    #[test]
    fn expression_fragment() {
        let expr = parse_expression("default(int)").expect("parses");
        assert_eq!(expr.kind(), DefaultExpression);
        assert_eq!(expr.to_string(), "default(int)");
        assert!(parse_expression("a b").is_err());
    }

    #[test]
    fn generic_invocation_versus_comparison() {
        let root = parse("class C { void M() { var a = Get<int>(); var b = x < y; } }");
        assert_eq!(kinds_of(&root, GenericName), vec!["Get<int>"]);
        assert_eq!(kinds_of(&root, BinaryExpression), vec!["x < y"]);
    }

    #[test]
    fn reports_position_of_error() {
        let err = parse_compilation_unit("class C { int }").expect_err("missing name");
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { offset: 14, found: CloseBrace, .. }
        ));
    }
}
